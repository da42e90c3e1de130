use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Gender of a santri record
///
/// Stored as `male` / `female`. The program's own terms (`putra` / `putri`)
/// are accepted as input aliases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    #[serde(alias = "putra")]
    #[strum(to_string = "male", serialize = "putra")]
    Male,
    #[sea_orm(string_value = "female")]
    #[serde(alias = "putri")]
    #[strum(to_string = "female", serialize = "putri")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

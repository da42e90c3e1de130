use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Role a santri record plays in the program
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// Regular student
    #[default]
    #[sea_orm(string_value = "santri")]
    Santri,
    /// Student acting as a mentor
    #[sea_orm(string_value = "pentashih")]
    Pentashih,
}

impl Role {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

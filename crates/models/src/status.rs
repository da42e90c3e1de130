use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// Whether a santri is currently enrolled
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Parses a list filter value.
    ///
    /// Besides `active` / `inactive`, list filters historically sent a boolean
    /// flag where `true` means active and `false` means inactive.
    ///
    /// # Returns
    /// `None` when the value is neither a status nor a boolean flag
    pub fn from_filter(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Self::Active),
            "false" => Some(Self::Inactive),
            other => Self::from_str(other).ok(),
        }
    }
}

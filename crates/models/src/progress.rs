use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Tri-state progress of a tracked activity (hafalan or setoran)
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Progress {
    #[default]
    #[sea_orm(string_value = "belum")]
    #[serde(rename = "belum")]
    #[strum(serialize = "belum")]
    NotStarted,
    #[sea_orm(string_value = "proses")]
    #[serde(rename = "proses")]
    #[strum(serialize = "proses")]
    InProgress,
    #[sea_orm(string_value = "sudah")]
    #[serde(rename = "sudah")]
    #[strum(serialize = "sudah")]
    Done,
}

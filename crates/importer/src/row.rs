use database::services::santri::{SantriProfile, SantriRecord};
use models::{Gender, Role, Status, birth_date::parse_birth_date};
use sea_orm::DbErr;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Placeholder the source sheet uses for an unknown value
const PLACEHOLDER: &str = "-";

/// One line of the santri sheet, exactly as read
///
/// Every column is optional so a sparse sheet still deserializes; meaning is
/// assigned in [`SantriRecord::try_from`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SantriRow {
    pub code: Option<String>,
    pub fullname: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub incoming_year: Option<String>,
    pub college_year: Option<String>,
    pub high_school: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<String>,
    pub full_address: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

/// Why a single row could not be stored
#[derive(Debug, Error)]
pub enum RowError {
    #[error("malformed row: {0}")]
    Malformed(csv::Error),

    #[error("row has neither fullname nor nickname")]
    MissingName,

    #[error("invalid {field} `{value}`")]
    InvalidValue { field: &'static str, value: String },

    #[error("store rejected row: {0}")]
    Store(DbErr),
}

/// Treats empty cells and the `-` placeholder as absent
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty() && value != PLACEHOLDER)
}

fn parse_enum<T>(field: &'static str, value: Option<String>) -> Result<Option<T>, RowError>
where
    T: FromStr,
{
    value
        .map(|value| T::from_str(&value).map_err(|_| RowError::InvalidValue { field, value }))
        .transpose()
}

impl TryFrom<SantriRow> for SantriRecord {
    type Error = RowError;

    fn try_from(row: SantriRow) -> Result<Self, Self::Error> {
        let nickname = normalize(row.nickname);
        let fullname = normalize(row.fullname)
            .or_else(|| nickname.clone())
            .ok_or(RowError::MissingName)?;

        let gender = parse_enum::<Gender>("gender", normalize(row.gender))?;
        let role = parse_enum::<Role>("role", normalize(row.role))?.unwrap_or_default();
        let status =
            parse_enum::<Status>("status", normalize(row.status))?.unwrap_or(Status::Inactive);

        // An unreadable date is dropped (and logged), not fatal for the row
        let birth_date = normalize(row.birth_date).and_then(|date| parse_birth_date(&date));

        Ok(SantriRecord {
            code: normalize(row.code),
            fullname,
            nickname,
            gender,
            role,
            status,
            profile: SantriProfile {
                email: normalize(row.email),
                phone: normalize(row.phone),
                incoming_year: normalize(row.incoming_year),
                college_year: normalize(row.college_year),
                high_school: normalize(row.high_school),
                university: normalize(row.university),
                faculty: normalize(row.faculty),
                major: normalize(row.major),
                birth_place: normalize(row.birth_place),
                birth_date,
                full_address: normalize(row.full_address),
                village: normalize(row.village),
                district: normalize(row.district),
                city: normalize(row.city),
                province: normalize(row.province),
            },
        })
    }
}

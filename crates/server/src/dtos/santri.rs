use crate::dtos::response::PaginationMeta;
use database::entities::santri;
use models::{Gender, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SantriQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    pub gender: Option<Gender>,
    /// `active` / `inactive`, or the boolean flags `true` / `false`
    pub status: Option<String>,
    pub role: Option<Role>,
    pub assigned: Option<bool>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Serialize)]
pub struct PaginatedSantriResponse {
    pub santri: Vec<santri::Model>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub id: i32,
    pub role: Role,
}

use models::{Gender, Role, Status};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "santri")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: Option<String>, // e.g. "A2501"
    pub fullname: String,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub role: Role,
    pub status: Status,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub incoming_year: Option<String>,
    pub college_year: Option<String>,
    pub high_school: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub full_address: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::mentor::Entity")]
    Mentor,
}

impl Related<super::mentor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mentor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

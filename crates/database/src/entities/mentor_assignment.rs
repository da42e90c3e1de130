use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction table for many-to-many relationship between mentors and santri
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentor_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub mentor_id: i32,
    pub santri_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mentor::Entity",
        from = "Column::MentorId",
        to = "super::mentor::Column::SantriId"
    )]
    Mentor,
    #[sea_orm(
        belongs_to = "super::santri::Entity",
        from = "Column::SantriId",
        to = "super::santri::Column::Id"
    )]
    Santri,
}

impl Related<super::mentor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mentor.def()
    }
}

impl Related<super::santri::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Santri.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A santri acting as pentashih; the key is the santri's own id
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub santri_id: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::santri::Entity",
        from = "Column::SantriId",
        to = "super::santri::Column::Id"
    )]
    Santri,
    #[sea_orm(has_many = "super::mentor_assignment::Entity")]
    MentorAssignments,
}

impl Related<super::santri::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Santri.def()
    }
}

impl Related<super::mentor_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MentorAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

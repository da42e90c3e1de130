use models::Progress;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Progress of one santri in one subject
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub santri_id: i32,
    pub pentashih_id: Option<i32>,
    pub category_id: i32,
    pub subject_id: i32,
    pub hafalan: Progress,
    pub setoran: Progress,
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
    #[sea_orm(
        belongs_to = "super::santri::Entity",
        from = "Column::PentashihId",
        to = "super::santri::Column::Id"
    )]
    Pentashih,
    #[sea_orm(
        belongs_to = "super::grade_category::Entity",
        from = "Column::CategoryId",
        to = "super::grade_category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::grade_subject::Entity",
        from = "Column::SubjectId",
        to = "super::grade_subject::Column::Id"
    )]
    Subject,
}

impl Related<super::grade_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::grade_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

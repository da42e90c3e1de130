use crate::m20250601_create_santri_table::Santri;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create grade_categories table
        manager
            .create_table(
                Table::create()
                    .table(GradeCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeCategories::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeCategories::Type).string_len(50))
                    .col(
                        ColumnDef::new(GradeCategories::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GradeCategories::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grade_subjects table
        manager
            .create_table(
                Table::create()
                    .table(GradeSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeSubjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradeSubjects::Name).string_len(100).not_null())
                    .col(ColumnDef::new(GradeSubjects::CategoryId).integer().not_null())
                    .col(
                        ColumnDef::new(GradeSubjects::HasHafalan)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GradeSubjects::HasSetoran)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GradeSubjects::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GradeSubjects::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grade_subjects-category_id")
                            .from(GradeSubjects::Table, GradeSubjects::CategoryId)
                            .to(GradeCategories::Table, GradeCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grades table, one row per (santri, subject)
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::SantriId).integer().not_null())
                    .col(ColumnDef::new(Grades::PentashihId).integer())
                    .col(ColumnDef::new(Grades::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Grades::SubjectId).integer().not_null())
                    .col(
                        ColumnDef::new(Grades::Hafalan)
                            .string_len(10)
                            .not_null()
                            .default("belum"),
                    )
                    .col(
                        ColumnDef::new(Grades::Setoran)
                            .string_len(10)
                            .not_null()
                            .default("belum"),
                    )
                    .col(
                        ColumnDef::new(Grades::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Grades::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-santri_id")
                            .from(Grades::Table, Grades::SantriId)
                            .to(Santri::Table, Santri::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-pentashih_id")
                            .from(Grades::Table, Grades::PentashihId)
                            .to(Santri::Table, Santri::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-category_id")
                            .from(Grades::Table, Grades::CategoryId)
                            .to(GradeCategories::Table, GradeCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-subject_id")
                            .from(Grades::Table, Grades::SubjectId)
                            .to(GradeSubjects::Table, GradeSubjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of dependencies
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GradeSubjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GradeCategories::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum GradeCategories {
    Table,
    Id,
    Name,
    Type,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum GradeSubjects {
    Table,
    Id,
    Name,
    CategoryId,
    HasHafalan,
    HasSetoran,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Grades {
    Table,
    Id,
    SantriId,
    PentashihId,
    CategoryId,
    SubjectId,
    Hafalan,
    Setoran,
    CreatedAt,
    UpdatedAt,
}

use crate::m20250601_create_santri_table::Santri;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A mentor is a santri record acting as pentashih, keyed by that santri's id
        manager
            .create_table(
                Table::create()
                    .table(Mentors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mentors::SantriId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Mentors::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Mentors::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mentors-santri_id")
                            .from(Mentors::Table, Mentors::SantriId)
                            .to(Santri::Table, Santri::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create mentor_assignments junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(MentorAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MentorAssignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MentorAssignments::MentorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorAssignments::SantriId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorAssignments::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mentor_assignments-mentor_id")
                            .from(MentorAssignments::Table, MentorAssignments::MentorId)
                            .to(Mentors::Table, Mentors::SantriId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mentor_assignments-santri_id")
                            .from(MentorAssignments::Table, MentorAssignments::SantriId)
                            .to(Santri::Table, Santri::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MentorAssignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Mentors::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Mentors {
    Table,
    SantriId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum MentorAssignments {
    Table,
    Id,
    MentorId,
    SantriId,
    CreatedAt,
}

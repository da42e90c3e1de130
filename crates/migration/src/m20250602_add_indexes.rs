use crate::{
    m20250601_create_grade_tables::{GradeSubjects, Grades},
    m20250601_create_santri_table::Santri,
    m20250602_create_mentor_tables::MentorAssignments,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Indexes on santri for the list filters
        manager
            .create_index(
                Index::create()
                    .name("idx_santri_code")
                    .table(Santri::Table)
                    .col(Santri::Code)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_santri_role")
                    .table(Santri::Table)
                    .col(Santri::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_santri_status")
                    .table(Santri::Table)
                    .col(Santri::Status)
                    .to_owned(),
            )
            .await?;

        // At most one grade per santri and subject; grade creation upserts on this
        manager
            .create_index(
                Index::create()
                    .name("idx_grades_santri_subject")
                    .table(Grades::Table)
                    .col(Grades::SantriId)
                    .col(Grades::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index on grade_subjects.category_id for listing subjects per category
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_subjects_category_id")
                    .table(GradeSubjects::Table)
                    .col(GradeSubjects::CategoryId)
                    .to_owned(),
            )
            .await?;

        // A santri is assigned to a given mentor at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_mentor_assignments_mentor_santri")
                    .table(MentorAssignments::Table)
                    .col(MentorAssignments::MentorId)
                    .col(MentorAssignments::SantriId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mentor_assignments_santri_id")
                    .table(MentorAssignments::Table)
                    .col(MentorAssignments::SantriId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        manager
            .drop_index(Index::drop().name("idx_mentor_assignments_santri_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_mentor_assignments_mentor_santri").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_grade_subjects_category_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_grades_santri_subject").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_santri_status").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_santri_role").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_santri_code").to_owned())
            .await?;

        Ok(())
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Santri::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Santri::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Santri::Code).string_len(10).unique_key())
                    .col(ColumnDef::new(Santri::Fullname).string_len(100).not_null())
                    .col(ColumnDef::new(Santri::Nickname).string_len(50))
                    .col(ColumnDef::new(Santri::Gender).string_len(10))
                    .col(
                        ColumnDef::new(Santri::Role)
                            .string_len(20)
                            .not_null()
                            .default("santri"),
                    )
                    .col(
                        ColumnDef::new(Santri::Status)
                            .string_len(10)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Santri::Email).string_len(100))
                    .col(ColumnDef::new(Santri::Phone).string_len(20))
                    .col(ColumnDef::new(Santri::IncomingYear).string_len(4))
                    .col(ColumnDef::new(Santri::CollegeYear).string_len(4))
                    .col(ColumnDef::new(Santri::HighSchool).string_len(100))
                    .col(ColumnDef::new(Santri::University).string_len(100))
                    .col(ColumnDef::new(Santri::Faculty).string_len(100))
                    .col(ColumnDef::new(Santri::Major).string_len(100))
                    .col(ColumnDef::new(Santri::BirthPlace).string_len(50))
                    .col(ColumnDef::new(Santri::BirthDate).date())
                    .col(ColumnDef::new(Santri::FullAddress).text())
                    .col(ColumnDef::new(Santri::Village).string_len(50))
                    .col(ColumnDef::new(Santri::District).string_len(50))
                    .col(ColumnDef::new(Santri::City).string_len(50))
                    .col(ColumnDef::new(Santri::Province).string_len(50))
                    .col(
                        ColumnDef::new(Santri::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Santri::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Santri::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Santri {
    Table,
    Id,
    Code,
    Fullname,
    Nickname,
    Gender,
    Role,
    Status,
    Email,
    Phone,
    IncomingYear,
    CollegeYear,
    HighSchool,
    University,
    Faculty,
    Major,
    BirthPlace,
    BirthDate,
    FullAddress,
    Village,
    District,
    City,
    Province,
    CreatedAt,
    UpdatedAt,
}

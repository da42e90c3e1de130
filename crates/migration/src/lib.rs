pub use sea_orm_migration::prelude::*;

mod m20250601_create_santri_table;
mod m20250601_create_grade_tables;
mod m20250602_create_mentor_tables;
mod m20250602_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_create_santri_table::Migration),
            Box::new(m20250601_create_grade_tables::Migration),
            Box::new(m20250602_create_mentor_tables::Migration),
            Box::new(m20250602_add_indexes::Migration),
        ]
    }
}

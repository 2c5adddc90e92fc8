pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_and_tag;
mod m20240101_000002_create_post;
mod m20240101_000003_create_comment;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_and_tag::Migration),
            Box::new(m20240101_000002_create_post::Migration),
            Box::new(m20240101_000003_create_comment::Migration),
        ]
    }
}

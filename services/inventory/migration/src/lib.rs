use sea_orm_migration::prelude::*;

mod m20260601_000001_create_products;
mod m20260601_000002_create_product_revisions;
mod m20260601_000003_create_api_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_products::Migration),
            Box::new(m20260601_000002_create_product_revisions::Migration),
            Box::new(m20260601_000003_create_api_users::Migration),
        ]
    }
}

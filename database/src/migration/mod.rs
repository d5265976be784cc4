pub use sea_orm_migration::prelude::*;

mod m20250210_000001_create_store_tables;
mod m20250306_000001_add_category_to_products;
mod m20250412_000001_add_checkout_id_to_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250210_000001_create_store_tables::Migration),
            Box::new(m20250306_000001_add_category_to_products::Migration),
            Box::new(m20250412_000001_add_checkout_id_to_transactions::Migration),
        ]
    }
}

// Database repository management

mod cart_repository;
mod product_repository;
pub mod stores;
mod transaction_repository;

pub use cart_repository::CartRepository;
pub use product_repository::{ProductFields, ProductRepository};
pub use transaction_repository::TransactionRepository;

use sea_orm::DatabaseConnection;

/// Container for all database repositories
pub struct Repositories {
    /// Repository for product operations
    pub products: ProductRepository,
    /// Repository for cart line operations
    pub cart: CartRepository,
    /// Repository for transaction history operations
    pub transactions: TransactionRepository,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            products: ProductRepository::new(conn.clone()),
            cart: CartRepository::new(conn.clone()),
            transactions: TransactionRepository::new(conn),
        }
    }
}

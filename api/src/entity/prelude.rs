//! Prelude module for convenient imports

pub use super::cart_items::Entity as CartItems;
pub use super::products::Entity as Products;
pub use super::transactions::Entity as Transactions;

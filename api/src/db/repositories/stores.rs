// Behavior contracts for the mutation surfaces the services depend on.
// The concrete repositories implement these; tests substitute in-memory fakes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::error::DbError;
use crate::entity::{cart_items, products, transactions};

/// Input for a new cart line; the repository assigns the row id and timestamp
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// Input for one transaction row of a checkout attempt
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub checkout_id: Uuid,
}

/// Product reads and the conditional stock decrement
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, DbError>;

    /// Applies `stock = stock - quantity` only while `stock >= quantity`
    /// still holds at write time. Returns false when the condition failed,
    /// i.e. the product was concurrently depleted.
    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool, DbError>;
}

/// Cart line operations, always scoped to the owning user
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_id(&self, cart_id: Uuid) -> Result<Option<cart_items::Model>, DbError>;

    async fn find_line(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<cart_items::Model>, DbError>;

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<cart_items::Model>, DbError>;

    async fn insert_line(&self, line: NewCartLine) -> Result<cart_items::Model, DbError>;

    async fn update_quantity(
        &self,
        cart_id: Uuid,
        quantity: i32,
        total_price: Decimal,
    ) -> Result<bool, DbError>;

    /// Deletes one line; returns the number of rows removed (0 is not an error)
    async fn delete_by_id(&self, user_id: Uuid, cart_id: Uuid) -> Result<u64, DbError>;

    /// Deletes the user's lines for the given products only; lines added
    /// after a checkout snapshot are untouched
    async fn delete_for_user(&self, user_id: Uuid, product_ids: &[Uuid]) -> Result<u64, DbError>;
}

/// Transaction rows of completed (or in-flight) checkouts
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_checkout(
        &self,
        checkout_id: Uuid,
    ) -> Result<Vec<transactions::Model>, DbError>;

    /// Inserts all rows of one checkout as a unit. The database-backed
    /// implementation wraps the batch in a transaction so it is
    /// all-or-nothing; callers still compensate with [`delete_by_checkout`]
    /// in case a backend half-applied the batch.
    ///
    /// [`delete_by_checkout`]: TransactionStore::delete_by_checkout
    async fn insert_all(
        &self,
        rows: Vec<NewTransaction>,
    ) -> Result<Vec<transactions::Model>, DbError>;

    async fn delete_by_checkout(&self, checkout_id: Uuid) -> Result<u64, DbError>;

    /// Removes a single line of a checkout (compensation for a line rejected
    /// at stock-decrement time)
    async fn delete_line(&self, checkout_id: Uuid, product_id: Uuid) -> Result<u64, DbError>;
}

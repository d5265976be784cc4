// In-memory store used by the service tests. Implements the store traits
// over mutexed maps, with failure knobs for the compensation paths the
// database-backed repositories cannot exercise without a live backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::repositories::stores::{
    CartStore, NewCartLine, NewTransaction, ProductStore, TransactionStore,
};
use crate::entity::{cart_items, products, transactions};

#[derive(Default)]
struct Failures {
    // Insert this many transaction rows, then fail the batch
    insert_after: Option<usize>,
    cart_clear: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<HashMap<Uuid, products::Model>>,
    cart: Mutex<HashMap<Uuid, cart_items::Model>>,
    transactions: Mutex<Vec<transactions::Model>>,
    failures: Mutex<Failures>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_product(&self, name: &str, price: Decimal, stock: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.products.lock().unwrap().insert(
            id,
            products::Model {
                id,
                name: name.to_string(),
                description: format!("{} (test)", name),
                product_type: "grocery".to_string(),
                price,
                stock,
                category: None,
                created_at: Utc::now().naive_utc(),
            },
        );
        id
    }

    pub fn seed_cart_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32, total: Decimal) -> Uuid {
        let cart_id = Uuid::new_v4();
        self.cart.lock().unwrap().insert(
            cart_id,
            cart_items::Model {
                cart_id,
                product_id,
                user_id,
                quantity,
                total_price: total,
                created_at: Utc::now().naive_utc(),
            },
        );
        cart_id
    }

    pub fn fail_insert_after(&self, rows: usize) {
        self.failures.lock().unwrap().insert_after = Some(rows);
    }

    pub fn fail_cart_clear(&self) {
        self.failures.lock().unwrap().cart_clear = true;
    }

    pub fn clear_failures(&self) {
        *self.failures.lock().unwrap() = Failures::default();
    }

    pub fn stock_of(&self, product_id: Uuid) -> i32 {
        self.products.lock().unwrap()[&product_id].stock
    }

    pub fn cart_lines(&self, user_id: Uuid) -> Vec<cart_items::Model> {
        let mut lines: Vec<cart_items::Model> = self
            .cart
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.created_at);
        lines
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.lock().unwrap().len()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, DbError> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool, DbError> {
        // Check and write under one lock, the same serialization the
        // conditional UPDATE gives the real repository
        let mut products = self.products.lock().unwrap();
        match products.get_mut(&id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_by_id(&self, cart_id: Uuid) -> Result<Option<cart_items::Model>, DbError> {
        Ok(self.cart.lock().unwrap().get(&cart_id).cloned())
    }

    async fn find_line(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<cart_items::Model>, DbError> {
        Ok(self
            .cart
            .lock()
            .unwrap()
            .values()
            .find(|l| l.user_id == user_id && l.product_id == product_id)
            .cloned())
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<cart_items::Model>, DbError> {
        Ok(self.cart_lines(user_id))
    }

    async fn insert_line(&self, line: NewCartLine) -> Result<cart_items::Model, DbError> {
        let model = cart_items::Model {
            cart_id: Uuid::new_v4(),
            product_id: line.product_id,
            user_id: line.user_id,
            quantity: line.quantity,
            total_price: line.total_price,
            created_at: Utc::now().naive_utc(),
        };
        self.cart
            .lock()
            .unwrap()
            .insert(model.cart_id, model.clone());
        Ok(model)
    }

    async fn update_quantity(
        &self,
        cart_id: Uuid,
        quantity: i32,
        total_price: Decimal,
    ) -> Result<bool, DbError> {
        let mut cart = self.cart.lock().unwrap();
        match cart.get_mut(&cart_id) {
            Some(line) => {
                line.quantity = quantity;
                line.total_price = total_price;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, user_id: Uuid, cart_id: Uuid) -> Result<u64, DbError> {
        let mut cart = self.cart.lock().unwrap();
        let removable = cart
            .get(&cart_id)
            .map(|l| l.user_id == user_id)
            .unwrap_or(false);
        if removable {
            cart.remove(&cart_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn delete_for_user(&self, user_id: Uuid, product_ids: &[Uuid]) -> Result<u64, DbError> {
        if self.failures.lock().unwrap().cart_clear {
            return Err(DbError::QueryError("cart clear failed (test)".to_string()));
        }

        let mut cart = self.cart.lock().unwrap();
        let before = cart.len();
        cart.retain(|_, l| !(l.user_id == user_id && product_ids.contains(&l.product_id)));
        Ok((before - cart.len()) as u64)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn find_by_checkout(
        &self,
        checkout_id: Uuid,
    ) -> Result<Vec<transactions::Model>, DbError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.checkout_id == checkout_id)
            .cloned()
            .collect())
    }

    async fn insert_all(
        &self,
        rows: Vec<NewTransaction>,
    ) -> Result<Vec<transactions::Model>, DbError> {
        let insert_after = self.failures.lock().unwrap().insert_after;
        let mut stored = self.transactions.lock().unwrap();
        let mut inserted = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            if let Some(limit) = insert_after {
                if index >= limit {
                    // Half-applied batch: rows written so far stay behind,
                    // exactly what the orchestrator must compensate for
                    return Err(DbError::QueryError("insert failed (test)".to_string()));
                }
            }

            let model = transactions::Model {
                transaction_id: Uuid::new_v4(),
                product_id: row.product_id,
                user_id: row.user_id,
                quantity: row.quantity,
                total_price: row.total_price,
                transaction_date: Utc::now().naive_utc(),
                checkout_id: row.checkout_id,
            };
            stored.push(model.clone());
            inserted.push(model);
        }

        Ok(inserted)
    }

    async fn delete_by_checkout(&self, checkout_id: Uuid) -> Result<u64, DbError> {
        let mut stored = self.transactions.lock().unwrap();
        let before = stored.len();
        stored.retain(|t| t.checkout_id != checkout_id);
        Ok((before - stored.len()) as u64)
    }

    async fn delete_line(&self, checkout_id: Uuid, product_id: Uuid) -> Result<u64, DbError> {
        let mut stored = self.transactions.lock().unwrap();
        let before = stored.len();
        stored.retain(|t| !(t.checkout_id == checkout_id && t.product_id == product_id));
        Ok((before - stored.len()) as u64)
    }
}

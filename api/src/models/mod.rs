// API request/response models
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::entity::{cart_items, products};

/// Custom deserializer to convert string to u64
fn deserialize_string_to_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    s.parse::<u64>().map_err(serde::de::Error::custom)
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

/// Query parameters shared by every grid-backed list endpoint
#[derive(Debug, Deserialize, Default)]
pub struct GridQuery {
    /// Global substring filter, case-insensitive, matched against every cell
    pub q: Option<String>,
    /// Category filter; absent means all categories
    pub category: Option<String>,
    /// Column id to sort by
    pub sort: Option<String>,
    /// "asc" or "desc"; anything else leaves the rows unsorted
    pub dir: Option<String>,
    #[serde(default = "default_page", deserialize_with = "deserialize_string_to_u64")]
    pub page: u64,
    #[serde(default = "default_limit", deserialize_with = "deserialize_string_to_u64")]
    pub per_page: u64,
}

/// Pagination metadata for responses
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// Response wrapper for grid-backed list endpoints
#[derive(Debug, Serialize)]
pub struct GridResponse<T> {
    pub rows: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Product data structure for API responses
#[derive(Debug, Clone, Serialize)]
pub struct ProductData {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
}

impl From<products::Model> for ProductData {
    fn from(m: products::Model) -> Self {
        ProductData {
            id: m.id,
            name: m.name,
            description: m.description,
            product_type: m.product_type,
            price: m.price,
            stock: m.stock,
            category: m.category,
        }
    }
}

/// Request body for POST /api/products: insert when id is absent, update
/// every field otherwise
#[derive(Debug, Deserialize)]
pub struct UpsertProductRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
}

/// Product fields denormalized into cart and history responses
#[derive(Debug, Clone, Serialize)]
pub struct ProductRef {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// One cart line, normalized into a fixed shape at the data-access boundary
#[derive(Debug, Clone, Serialize)]
pub struct CartItemData {
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub product: Option<ProductRef>,
}

impl CartItemData {
    pub fn from_line(line: cart_items::Model, product: Option<ProductRef>) -> Self {
        CartItemData {
            cart_id: line.cart_id,
            product_id: line.product_id,
            user_id: line.user_id,
            quantity: line.quantity,
            total_price: line.total_price,
            product,
        }
    }
}

/// Request body for POST /api/cart
#[derive(Debug, Deserialize)]
pub struct AddCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Request body for PUT /api/cart/{cart_id}
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

/// One line of a checkout snapshot as submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub total_price: Option<Decimal>,
}

/// Request body for POST /api/checkout
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub cart: Vec<CheckoutLine>,
    /// Client-supplied idempotency key; generated server-side when absent
    pub checkout_id: Option<Uuid>,
}

/// A cart line the stock-decrement step could not honor
#[derive(Debug, Clone, Serialize)]
pub struct RejectedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub reason: String,
}

/// Transaction history row for API responses
#[derive(Debug, Clone, Serialize)]
pub struct TransactionData {
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub product: Option<ProductRef>,
    pub quantity: i32,
    pub total_price: Decimal,
    pub transaction_date: String,
}

impl TransactionData {
    pub fn from_row(
        transaction_id: Uuid,
        product_id: Uuid,
        product: Option<ProductRef>,
        quantity: i32,
        total_price: Decimal,
        transaction_date: NaiveDateTime,
    ) -> Self {
        TransactionData {
            transaction_id,
            product_id,
            product,
            quantity,
            total_price,
            transaction_date: transaction_date.to_string(),
        }
    }
}

/// Response for POST /api/checkout
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub checkout_id: Uuid,
    pub transactions: Vec<TransactionData>,
    pub rejected: Vec<RejectedLine>,
}

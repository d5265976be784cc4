// Handlers Module
// This module contains the API endpoint handlers

mod cart;
mod checkout;
mod health;
mod products;
mod transactions;

pub use cart::{add_to_cart, get_cart, remove_from_cart, update_cart_quantity};
pub use checkout::checkout;
pub use health::health_check;
pub use products::{get_products, upsert_product};
pub use transactions::{clear_transactions, get_transactions};

use std::sync::Arc;

use crate::auth::SessionClient;
use crate::db::Repositories;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<Repositories>,
    pub sessions: SessionClient,
}

// Handlers for the product catalog endpoints

use axum::{
    Json,
    extract::{Query, State},
};

use crate::auth::AuthSession;
use crate::error::StoreResult;
use crate::handlers::AppState;
use crate::models::{GridQuery, GridResponse, ProductData, UpsertProductRequest};
use crate::services::catalog_service;

/// GET /api/products?q=...&category=...&sort=...&dir=...&page=...&per_page=...
/// Products not yet in the caller's cart, filtered/sorted/paginated
pub async fn get_products(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Query(query): Query<GridQuery>,
) -> StoreResult<Json<GridResponse<ProductData>>> {
    let response = catalog_service::get_products(&state, &user, &query).await?;
    Ok(Json(response))
}

/// POST /api/products
/// Inserts a product, or updates an existing one when an id is supplied
pub async fn upsert_product(
    State(state): State<AppState>,
    AuthSession(_user): AuthSession,
    Json(request): Json<UpsertProductRequest>,
) -> StoreResult<Json<ProductData>> {
    let response = catalog_service::upsert_product(&state, request).await?;
    Ok(Json(response))
}

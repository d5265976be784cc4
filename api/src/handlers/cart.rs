// Handlers for the cart endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::error::StoreResult;
use crate::handlers::AppState;
use crate::models::{
    AddCartRequest, CartItemData, GridQuery, GridResponse, UpdateCartRequest,
};
use crate::services::cart_service;

/// GET /api/cart
/// The caller's cart lines joined with product fields
pub async fn get_cart(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Query(query): Query<GridQuery>,
) -> StoreResult<Json<GridResponse<CartItemData>>> {
    let response = cart_service::get_cart(&state, &user, &query).await?;
    Ok(Json(response))
}

/// POST /api/cart
/// Adds a product to the caller's cart after a stock check
pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Json(request): Json<AddCartRequest>,
) -> StoreResult<Json<CartItemData>> {
    let item = cart_service::add_to_cart(
        &state.repositories.products,
        &state.repositories.cart,
        &user,
        request,
    )
    .await?;
    Ok(Json(item))
}

/// PUT /api/cart/{cart_id}
/// Changes a line's quantity; the total is recomputed server-side
pub async fn update_cart_quantity(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Path(cart_id): Path<Uuid>,
    Json(request): Json<UpdateCartRequest>,
) -> StoreResult<Json<CartItemData>> {
    let item = cart_service::update_quantity(
        &state.repositories.products,
        &state.repositories.cart,
        &user,
        cart_id,
        request,
    )
    .await?;
    Ok(Json(item))
}

/// DELETE /api/cart/{cart_id}
/// Removes a line; removing one that is already gone is a success no-op
pub async fn remove_from_cart(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Path(cart_id): Path<Uuid>,
) -> StoreResult<Json<Value>> {
    let removed = cart_service::remove_from_cart(&state.repositories.cart, &user, cart_id).await?;
    Ok(Json(json!({
        "removed": removed,
    })))
}

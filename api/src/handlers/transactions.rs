// Handlers for the transaction history endpoints

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};

use crate::auth::AuthSession;
use crate::error::StoreResult;
use crate::handlers::AppState;
use crate::models::{GridQuery, GridResponse, TransactionData};
use crate::services::transaction_service;

/// GET /api/transactions
/// Purchase history, newest first, joined with product fields
pub async fn get_transactions(
    State(state): State<AppState>,
    AuthSession(_user): AuthSession,
    Query(query): Query<GridQuery>,
) -> StoreResult<Json<GridResponse<TransactionData>>> {
    let response = transaction_service::get_transactions(&state, &query).await?;
    Ok(Json(response))
}

/// DELETE /api/transactions
/// Clears the whole history, an explicit administrative action
pub async fn clear_transactions(
    State(state): State<AppState>,
    AuthSession(_user): AuthSession,
) -> StoreResult<Json<Value>> {
    let removed = transaction_service::clear_transactions(&state).await?;
    Ok(Json(json!({
        "success": true,
        "removed": removed,
    })))
}

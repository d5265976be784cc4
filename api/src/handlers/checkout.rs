// Handler for POST /api/checkout

use axum::{Json, extract::State};

use crate::auth::AuthSession;
use crate::error::StoreResult;
use crate::handlers::AppState;
use crate::models::{CheckoutRequest, CheckoutResponse, TransactionData};
use crate::services::checkout_service;

/// POST /api/checkout
/// Converts the submitted cart snapshot into transaction rows, clears the
/// matching cart lines and decrements stock. Lines the stock could no longer
/// cover are reported in `rejected` while the rest of the checkout stands.
pub async fn checkout(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Json(request): Json<CheckoutRequest>,
) -> StoreResult<Json<CheckoutResponse>> {
    let outcome = checkout_service::process_checkout(
        &state.repositories.products,
        &state.repositories.cart,
        &state.repositories.transactions,
        &user,
        request,
    )
    .await?;

    let message = if outcome.replayed {
        "Checkout already processed".to_string()
    } else if outcome.rejected.is_empty() {
        "Checkout successful".to_string()
    } else {
        format!(
            "Checkout completed with {} rejected line(s)",
            outcome.rejected.len()
        )
    };

    let transactions = outcome
        .transactions
        .into_iter()
        .map(|t| {
            TransactionData::from_row(
                t.transaction_id,
                t.product_id,
                None,
                t.quantity,
                t.total_price,
                t.transaction_date,
            )
        })
        .collect();

    Ok(Json(CheckoutResponse {
        message,
        checkout_id: outcome.checkout_id,
        transactions,
        rejected: outcome.rejected,
    }))
}

// Transaction service — business logic for the /api/transactions endpoints

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::handlers::AppState;
use crate::models::{GridQuery, GridResponse, ProductRef, TransactionData};
use crate::services::grid_support;

/// Purchase history, newest first, joined with product name and description
pub async fn get_transactions(
    state: &AppState,
    query: &GridQuery,
) -> StoreResult<GridResponse<TransactionData>> {
    let transactions = state
        .repositories
        .transactions
        .get_all()
        .await
        .map_err(|e| {
            tracing::warn!("Database error in get_transactions: {:?}", e);
            StoreError::from(e)
        })?;

    let product_ids: Vec<Uuid> = transactions.iter().map(|t| t.product_id).collect();
    let products = state
        .repositories
        .products
        .find_by_ids(&product_ids)
        .await
        .map_err(|e| {
            tracing::warn!("Database error in get_transactions: {:?}", e);
            StoreError::from(e)
        })?;

    let rows: Vec<TransactionData> = transactions
        .into_iter()
        .map(|t| {
            let product = products.iter().find(|p| p.id == t.product_id).map(|p| ProductRef {
                name: p.name.clone(),
                description: p.description.clone(),
                price: p.price,
            });
            TransactionData::from_row(
                t.transaction_id,
                t.product_id,
                product,
                t.quantity,
                t.total_price,
                t.transaction_date,
            )
        })
        .collect();

    Ok(grid_support::transaction_grid(rows, query))
}

/// Clears the whole history, an explicit administrative action
pub async fn clear_transactions(state: &AppState) -> StoreResult<u64> {
    let removed = state
        .repositories
        .transactions
        .delete_all()
        .await
        .map_err(|e| {
            tracing::warn!("Database error in clear_transactions: {:?}", e);
            StoreError::from(e)
        })?;

    tracing::info!(removed, "transaction history cleared");
    Ok(removed)
}

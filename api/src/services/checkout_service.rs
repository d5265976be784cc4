// Checkout orchestrator — business logic for POST /api/checkout
//
// The backend offers no multi-table atomicity across these calls, so the
// whole operation runs as a compensating sequence: transaction recording is
// all-or-nothing (rolled back by checkout_id if half-applied), a cart-clear
// failure after recording is a degraded state rather than a rollback, and
// stock decrements are per-line conditional updates whose rejections are
// compensated individually.

use std::fmt;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::repositories::stores::{CartStore, NewTransaction, ProductStore, TransactionStore};
use crate::entity::transactions;
use crate::error::{StoreError, StoreResult};
use crate::models::{CheckoutRequest, RejectedLine};

/// States one checkout attempt moves through. CartCleared is reachable only
/// from TransactionsRecorded; any state may exit early to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Pending,
    Authenticated,
    TransactionsRecorded,
    CartCleared,
    StockAdjusted,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutState::Pending => "pending",
            CheckoutState::Authenticated => "authenticated",
            CheckoutState::TransactionsRecorded => "transactions_recorded",
            CheckoutState::CartCleared => "cart_cleared",
            CheckoutState::StockAdjusted => "stock_adjusted",
        };
        write!(f, "{}", name)
    }
}

/// Result of a completed checkout attempt
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub checkout_id: Uuid,
    pub transactions: Vec<transactions::Model>,
    pub rejected: Vec<RejectedLine>,
    /// True when the checkout_id had already been processed and the stored
    /// rows were returned without writing anything
    pub replayed: bool,
}

/// Runs one checkout attempt for an authenticated caller.
///
/// The session is resolved by the extractor before this runs, so the
/// operation enters at Authenticated once the snapshot validates.
pub async fn process_checkout(
    products: &dyn ProductStore,
    carts: &dyn CartStore,
    transactions: &dyn TransactionStore,
    user: &AuthUser,
    request: CheckoutRequest,
) -> StoreResult<CheckoutOutcome> {
    let mut state = CheckoutState::Pending;
    tracing::debug!(user = %user.id, lines = request.cart.len(), state = %state, "checkout received");

    if request.cart.is_empty() {
        return Err(StoreError::InvalidRequest("Cart is empty".to_string()));
    }
    if let Some(line) = request.cart.iter().find(|l| l.quantity < 1) {
        return Err(StoreError::InvalidRequest(format!(
            "Invalid quantity {} for product {}",
            line.quantity, line.product_id
        )));
    }

    state = CheckoutState::Authenticated;
    let checkout_id = request.checkout_id.unwrap_or_else(Uuid::new_v4);
    tracing::debug!(%checkout_id, user = %user.id, state = %state, "checkout started");

    // Idempotency probe: a replayed checkout_id returns the stored rows and
    // writes nothing, so client retries cannot double-insert.
    let existing = transactions.find_by_checkout(checkout_id).await?;
    if !existing.is_empty() {
        tracing::info!(%checkout_id, "checkout replayed, returning recorded transactions");
        return Ok(CheckoutOutcome {
            checkout_id,
            transactions: existing,
            rejected: Vec::new(),
            replayed: true,
        });
    }

    // Step 1: record every line, all-or-nothing
    let rows: Vec<NewTransaction> = request
        .cart
        .iter()
        .map(|line| NewTransaction {
            product_id: line.product_id,
            user_id: user.id,
            quantity: line.quantity,
            total_price: line.total_price.unwrap_or(Decimal::ZERO),
            checkout_id,
        })
        .collect();

    let recorded = match transactions.insert_all(rows).await {
        Ok(recorded) => recorded,
        Err(err) => {
            tracing::warn!(%checkout_id, "transaction recording failed: {}", err);
            // A backend without batch atomicity may have written a subset;
            // remove it so a retry starts from a clean slate.
            if let Err(cleanup_err) = transactions.delete_by_checkout(checkout_id).await {
                tracing::error!(
                    %checkout_id,
                    "compensation after failed recording also failed: {}",
                    cleanup_err
                );
            }
            return Err(StoreError::PersistenceFailure(
                "Could not record transactions".to_string(),
            ));
        }
    };

    state = CheckoutState::TransactionsRecorded;
    tracing::debug!(%checkout_id, state = %state, rows = recorded.len(), "transactions recorded");

    // Step 2: clear the snapshot's cart lines for this user only. Matching
    // by product id keeps lines added after the snapshot alive. The purchase
    // is already durable here, so a failure is degraded state, not rollback:
    // reversing a recorded purchase is worse than a stale cart.
    let product_ids: Vec<Uuid> = request.cart.iter().map(|l| l.product_id).collect();
    if let Err(err) = carts.delete_for_user(user.id, &product_ids).await {
        tracing::error!(%checkout_id, "cart clearing failed after recording: {}", err);
        return Err(StoreError::CartCleanupFailed(
            "Purchase recorded but the cart could not be cleared".to_string(),
        ));
    }

    state = CheckoutState::CartCleared;
    tracing::debug!(%checkout_id, state = %state, "cart cleared");

    // Step 3: decrement stock per line. Each conditional update re-checks
    // the stock at write time; a line that no longer fits is rejected
    // individually and its transaction row compensated, while the rest of
    // the checkout stands.
    let mut kept = recorded;
    let mut rejected = Vec::new();

    for line in &request.cart {
        let outcome = products.decrement_stock(line.product_id, line.quantity).await;
        let reason = match outcome {
            Ok(true) => continue,
            Ok(false) => "out of stock",
            Err(err) => {
                tracing::warn!(
                    %checkout_id,
                    product = %line.product_id,
                    "stock decrement failed: {}",
                    err
                );
                "stock update failed"
            }
        };

        if let Err(err) = transactions.delete_line(checkout_id, line.product_id).await {
            tracing::error!(
                %checkout_id,
                product = %line.product_id,
                "could not compensate rejected line: {}",
                err
            );
        }
        kept.retain(|t| t.product_id != line.product_id);
        rejected.push(RejectedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            reason: reason.to_string(),
        });
    }

    state = CheckoutState::StockAdjusted;
    tracing::info!(
        %checkout_id,
        state = %state,
        completed = kept.len(),
        rejected = rejected.len(),
        "checkout complete"
    );

    Ok(CheckoutOutcome {
        checkout_id,
        transactions: kept,
        rejected,
        replayed: false,
    })
}

// Catalog service — business logic for the /api/products endpoints

use crate::auth::AuthUser;
use crate::db::repositories::stores::ProductStore;
use crate::db::repositories::ProductFields;
use crate::error::{StoreError, StoreResult};
use crate::handlers::AppState;
use crate::models::{GridQuery, GridResponse, ProductData, UpsertProductRequest};
use crate::services::grid_support;

/// Products available to the caller (anything already in their cart is
/// hidden), run through the shared grid
pub async fn get_products(
    state: &AppState,
    user: &AuthUser,
    query: &GridQuery,
) -> StoreResult<GridResponse<ProductData>> {
    let carted = state
        .repositories
        .cart
        .carted_product_ids(user.id)
        .await
        .map_err(|e| {
            tracing::warn!("Database error in get_products: {:?}", e);
            StoreError::from(e)
        })?;

    let products = state
        .repositories
        .products
        .find_all_excluding(&carted)
        .await
        .map_err(|e| {
            tracing::warn!("Database error in get_products: {:?}", e);
            StoreError::from(e)
        })?;

    let rows: Vec<ProductData> = products.into_iter().map(ProductData::from).collect();
    Ok(grid_support::product_grid(rows, query))
}

/// Inserts a product, or updates every field of an existing one when the
/// request carries an id
pub async fn upsert_product(
    state: &AppState,
    request: UpsertProductRequest,
) -> StoreResult<ProductData> {
    if request.price.is_sign_negative() || request.stock < 0 {
        return Err(StoreError::InvalidRequest(
            "Price and stock must not be negative".to_string(),
        ));
    }

    if let Some(id) = request.id {
        let exists = state.repositories.products.find_by_id(id).await?;
        if exists.is_none() {
            return Err(StoreError::NotFound(format!("Product {} not found", id)));
        }
    }

    let fields = ProductFields {
        name: request.name,
        description: request.description,
        product_type: request.product_type,
        price: request.price,
        stock: request.stock,
        category: request.category,
    };

    let saved = state
        .repositories
        .products
        .upsert(request.id, fields)
        .await
        .map_err(|e| {
            tracing::warn!("Database error in upsert_product: {:?}", e);
            StoreError::from(e)
        })?;

    Ok(ProductData::from(saved))
}

// Cart service — business logic for the /api/cart endpoints

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::repositories::stores::{CartStore, NewCartLine, ProductStore};
use crate::entity::products;
use crate::error::{StoreError, StoreResult};
use crate::handlers::AppState;
use crate::models::{
    AddCartRequest, CartItemData, GridQuery, GridResponse, ProductRef, UpdateCartRequest,
};
use crate::services::grid_support;

fn product_ref(product: &products::Model) -> ProductRef {
    ProductRef {
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
    }
}

/// The caller's cart, joined with product fields and run through the shared
/// grid for filtering/sorting/pagination
pub async fn get_cart(
    state: &AppState,
    user: &AuthUser,
    query: &GridQuery,
) -> StoreResult<GridResponse<CartItemData>> {
    let lines = state
        .repositories
        .cart
        .find_for_user(user.id)
        .await
        .map_err(|e| {
            tracing::warn!("Database error in get_cart: {:?}", e);
            StoreError::from(e)
        })?;

    let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let products = state
        .repositories
        .products
        .find_by_ids(&product_ids)
        .await
        .map_err(|e| {
            tracing::warn!("Database error in get_cart: {:?}", e);
            StoreError::from(e)
        })?;

    let items: Vec<CartItemData> = lines
        .into_iter()
        .map(|line| {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .map(product_ref);
            CartItemData::from_line(line, product)
        })
        .collect();

    Ok(grid_support::cart_grid(items, query))
}

/// Validates stock (counting quantity already in the caller's cart) and adds
/// a line; adding a product twice folds into the existing line
pub async fn add_to_cart(
    products: &dyn ProductStore,
    carts: &dyn CartStore,
    user: &AuthUser,
    request: AddCartRequest,
) -> StoreResult<CartItemData> {
    if request.quantity < 1 {
        return Err(StoreError::InvalidRequest(format!(
            "Invalid quantity {}",
            request.quantity
        )));
    }

    let product = products
        .find_by_id(request.product_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Product {} not found", request.product_id)))?;

    let existing = carts.find_line(user.id, request.product_id).await?;
    let already_carted = existing.as_ref().map(|l| l.quantity).unwrap_or(0);
    let wanted = request.quantity + already_carted;

    // The decisive check happens again at checkout; this keeps carts honest
    // at display time
    if product.stock < wanted {
        return Err(StoreError::OutOfStock(format!(
            "Only {} of {} in stock",
            product.stock, product.name
        )));
    }

    let total_price = Decimal::from(wanted) * product.price;

    let line = match existing {
        Some(mut line) => {
            carts
                .update_quantity(line.cart_id, wanted, total_price)
                .await?;
            line.quantity = wanted;
            line.total_price = total_price;
            line
        }
        None => {
            carts
                .insert_line(NewCartLine {
                    product_id: request.product_id,
                    user_id: user.id,
                    quantity: request.quantity,
                    total_price,
                })
                .await?
        }
    };

    Ok(CartItemData::from_line(line, Some(product_ref(&product))))
}

/// Changes a line's quantity, recomputing the total server-side
pub async fn update_quantity(
    products: &dyn ProductStore,
    carts: &dyn CartStore,
    user: &AuthUser,
    cart_id: Uuid,
    request: UpdateCartRequest,
) -> StoreResult<CartItemData> {
    if request.quantity < 1 {
        return Err(StoreError::InvalidRequest(format!(
            "Invalid quantity {}",
            request.quantity
        )));
    }

    let mut line = carts
        .find_by_id(cart_id)
        .await?
        .filter(|l| l.user_id == user.id)
        .ok_or_else(|| StoreError::NotFound(format!("Cart line {} not found", cart_id)))?;

    let product = products
        .find_by_id(line.product_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Product {} not found", line.product_id)))?;

    if product.stock < request.quantity {
        return Err(StoreError::OutOfStock(format!(
            "Only {} of {} in stock",
            product.stock, product.name
        )));
    }

    let total_price = Decimal::from(request.quantity) * product.price;
    carts
        .update_quantity(line.cart_id, request.quantity, total_price)
        .await?;

    line.quantity = request.quantity;
    line.total_price = total_price;
    Ok(CartItemData::from_line(line, Some(product_ref(&product))))
}

/// Removes a line. Idempotent: removing an absent line is a no-op, not an
/// error. Returns how many rows were deleted (0 or 1).
pub async fn remove_from_cart(
    carts: &dyn CartStore,
    user: &AuthUser,
    cart_id: Uuid,
) -> StoreResult<u64> {
    let removed = carts.delete_by_id(user.id, cart_id).await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryStore;
    use rust_decimal_macros::dec;

    fn shopper() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: None,
        }
    }

    #[tokio::test]
    async fn add_computes_total_from_unit_price() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Kale", dec!(2.50), 10);

        let item = add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: p1,
                quantity: 3,
            },
        )
        .await
        .unwrap();

        assert_eq!(item.quantity, 3);
        assert_eq!(item.total_price, dec!(7.50));
        assert_eq!(item.product.unwrap().name, "Kale");
    }

    #[tokio::test]
    async fn adding_same_product_folds_into_one_line() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Tempeh", dec!(4.00), 10);

        add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: p1,
                quantity: 2,
            },
        )
        .await
        .unwrap();
        let folded = add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: p1,
                quantity: 3,
            },
        )
        .await
        .unwrap();

        assert_eq!(folded.quantity, 5);
        assert_eq!(folded.total_price, dec!(20.00));
        assert_eq!(store.cart_lines(user.id).len(), 1);
    }

    #[tokio::test]
    async fn add_counts_quantity_already_in_cart_against_stock() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Oat Milk", dec!(3.50), 5);

        add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: p1,
                quantity: 4,
            },
        )
        .await
        .unwrap();

        let err = add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: p1,
                quantity: 2,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::OutOfStock(_)));
        // The existing line is untouched
        assert_eq!(store.cart_lines(user.id)[0].quantity, 4);
    }

    #[tokio::test]
    async fn add_unknown_product_is_not_found() {
        let store = MemoryStore::new();
        let user = shopper();

        let err = add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: Uuid::new_v4(),
                quantity: 1,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Kale", dec!(2.50), 10);

        let err = add_to_cart(
            &store,
            &store,
            &user,
            AddCartRequest {
                product_id: p1,
                quantity: 0,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::InvalidRequest(_)));
        assert!(store.cart_lines(user.id).is_empty());
    }

    #[tokio::test]
    async fn update_rejects_quantity_below_one_and_keeps_stored_value() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Kale", dec!(2.50), 10);
        let cart_id = store.seed_cart_line(user.id, p1, 2, dec!(5.00));

        let err = update_quantity(
            &store,
            &store,
            &user,
            cart_id,
            UpdateCartRequest { quantity: 0 },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::InvalidRequest(_)));
        assert_eq!(store.cart_lines(user.id)[0].quantity, 2);
    }

    #[tokio::test]
    async fn update_recomputes_total_server_side() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Almond Butter", dec!(10.00), 10);
        let cart_id = store.seed_cart_line(user.id, p1, 1, dec!(10.00));

        let updated = update_quantity(
            &store,
            &store,
            &user,
            cart_id,
            UpdateCartRequest { quantity: 4 },
        )
        .await
        .unwrap();

        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.total_price, dec!(40.00));
    }

    #[tokio::test]
    async fn update_rejects_quantity_beyond_stock() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Tempeh", dec!(4.00), 3);
        let cart_id = store.seed_cart_line(user.id, p1, 2, dec!(8.00));

        let err = update_quantity(
            &store,
            &store,
            &user,
            cart_id,
            UpdateCartRequest { quantity: 5 },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::OutOfStock(_)));
        assert_eq!(store.cart_lines(user.id)[0].quantity, 2);
    }

    #[tokio::test]
    async fn update_cannot_touch_another_users_line() {
        let store = MemoryStore::new();
        let owner = shopper();
        let intruder = shopper();
        let p1 = store.seed_product("Kale", dec!(2.50), 10);
        let cart_id = store.seed_cart_line(owner.id, p1, 2, dec!(5.00));

        let err = update_quantity(
            &store,
            &store,
            &intruder,
            cart_id,
            UpdateCartRequest { quantity: 3 },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.cart_lines(owner.id)[0].quantity, 2);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = MemoryStore::new();
        let user = shopper();
        let p1 = store.seed_product("Kale", dec!(2.50), 10);
        let cart_id = store.seed_cart_line(user.id, p1, 2, dec!(5.00));

        let first = remove_from_cart(&store, &user, cart_id).await.unwrap();
        let second = remove_from_cart(&store, &user, cart_id).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert!(store.cart_lines(user.id).is_empty());
    }
}

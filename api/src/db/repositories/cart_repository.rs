// Repository for cart line queries, always scoped to the owning user

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::repositories::stores::{CartStore, NewCartLine};
use crate::entity::{cart_items, prelude::CartItems};

#[derive(Clone)]
pub struct CartRepository {
    conn: DatabaseConnection,
}

impl CartRepository {
    /// Creates a new cart repository with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        CartRepository { conn }
    }

    /// Product ids currently in the user's cart (used by the catalog to hide
    /// already-carted products)
    pub async fn carted_product_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbError> {
        let lines = CartItems::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await?;

        Ok(lines.into_iter().map(|l| l.product_id).collect())
    }
}

#[async_trait]
impl CartStore for CartRepository {
    async fn find_by_id(&self, cart_id: Uuid) -> Result<Option<cart_items::Model>, DbError> {
        let result = CartItems::find_by_id(cart_id)
            .one(&self.conn)
            .await?;
        Ok(result)
    }

    async fn find_line(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<cart_items::Model>, DbError> {
        let result = CartItems::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(&self.conn)
            .await?;
        Ok(result)
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<cart_items::Model>, DbError> {
        let results = CartItems::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_desc(cart_items::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    async fn insert_line(&self, line: NewCartLine) -> Result<cart_items::Model, DbError> {
        let model = cart_items::ActiveModel {
            cart_id: Set(Uuid::new_v4()),
            product_id: Set(line.product_id),
            user_id: Set(line.user_id),
            quantity: Set(line.quantity),
            total_price: Set(line.total_price),
            created_at: Set(Utc::now().naive_utc()),
        };

        let inserted = model.insert(&self.conn).await?;
        Ok(inserted)
    }

    async fn update_quantity(
        &self,
        cart_id: Uuid,
        quantity: i32,
        total_price: Decimal,
    ) -> Result<bool, DbError> {
        let result = CartItems::update_many()
            .col_expr(cart_items::Column::Quantity, Expr::value(quantity))
            .col_expr(cart_items::Column::TotalPrice, Expr::value(total_price))
            .filter(cart_items::Column::CartId.eq(cart_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_by_id(&self, user_id: Uuid, cart_id: Uuid) -> Result<u64, DbError> {
        let result = CartItems::delete_many()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_for_user(&self, user_id: Uuid, product_ids: &[Uuid]) -> Result<u64, DbError> {
        if product_ids.is_empty() {
            return Ok(0);
        }

        let result = CartItems::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.is_in(product_ids.to_vec()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}

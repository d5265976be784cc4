// Repository for product queries and the conditional stock decrement

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::repositories::stores::ProductStore;
use crate::entity::{prelude::Products, products};

#[derive(Clone)]
pub struct ProductRepository {
    conn: DatabaseConnection,
}

/// Fields accepted by [`ProductRepository::upsert`]
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub product_type: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
}

impl ProductRepository {
    /// Creates a new product repository with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        ProductRepository { conn }
    }

    /// Get all products, newest first, excluding the given ids
    pub async fn find_all_excluding(
        &self,
        excluded: &[Uuid],
    ) -> Result<Vec<products::Model>, DbError> {
        let mut query = Products::find();

        if !excluded.is_empty() {
            query = query.filter(products::Column::Id.is_not_in(excluded.to_vec()));
        }

        let results = query
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    /// Find products by multiple ids
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<products::Model>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Products::find()
            .filter(products::Column::Id.is_in(ids.to_vec()))
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    /// Insert a new product, or update every field of an existing one
    pub async fn upsert(
        &self,
        id: Option<Uuid>,
        fields: ProductFields,
    ) -> Result<products::Model, DbError> {
        match id {
            Some(id) => {
                let existing = Products::find_by_id(id)
                    .one(&self.conn)
                    .await?
                    .ok_or_else(|| {
                        DbError::QueryError(format!("Product {} not found for update", id))
                    })?;

                let mut active: products::ActiveModel = existing.into();
                active.name = Set(fields.name);
                active.description = Set(fields.description);
                active.product_type = Set(fields.product_type);
                active.price = Set(fields.price);
                active.stock = Set(fields.stock);
                active.category = Set(fields.category);

                let updated = active.update(&self.conn).await?;
                Ok(updated)
            }
            None => {
                let model = products::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(fields.name),
                    description: Set(fields.description),
                    product_type: Set(fields.product_type),
                    price: Set(fields.price),
                    stock: Set(fields.stock),
                    category: Set(fields.category),
                    created_at: Set(Utc::now().naive_utc()),
                };

                let inserted = model.insert(&self.conn).await?;
                Ok(inserted)
            }
        }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, DbError> {
        let result = Products::find_by_id(id).one(&self.conn).await?;
        Ok(result)
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool, DbError> {
        // Compare-and-swap on the stock column: the filter re-checks the
        // precondition at write time, so two checkouts racing on the same
        // product cannot drive stock negative.
        let result = Products::update_many()
            .col_expr(
                products::Column::Stock,
                Expr::col(products::Column::Stock).sub(quantity),
            )
            .filter(products::Column::Id.eq(id))
            .filter(products::Column::Stock.gte(quantity))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

// Repository for transaction (purchase history) rows
// All queries use SeaORM, no raw SQL.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::repositories::stores::{NewTransaction, TransactionStore};
use crate::entity::{prelude::Transactions, transactions};

#[derive(Clone)]
pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        TransactionRepository { conn }
    }

    /// Retrieves all transactions, newest first
    pub async fn get_all(&self) -> Result<Vec<transactions::Model>, DbError> {
        let txs = Transactions::find()
            .order_by_desc(transactions::Column::TransactionDate)
            .all(&self.conn)
            .await?;

        Ok(txs)
    }

    /// Deletes every history row; returns how many were removed
    pub async fn delete_all(&self) -> Result<u64, DbError> {
        let result = Transactions::delete_many()
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn find_by_checkout(
        &self,
        checkout_id: Uuid,
    ) -> Result<Vec<transactions::Model>, DbError> {
        let results = Transactions::find()
            .filter(transactions::Column::CheckoutId.eq(checkout_id))
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    async fn insert_all(
        &self,
        rows: Vec<NewTransaction>,
    ) -> Result<Vec<transactions::Model>, DbError> {
        // One database transaction around the whole batch: either every row
        // of the checkout is recorded or none is.
        let inserted = self
            .conn
            .transaction::<_, Vec<transactions::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    let mut models = Vec::with_capacity(rows.len());

                    for row in rows {
                        let model = transactions::ActiveModel {
                            transaction_id: Set(Uuid::new_v4()),
                            product_id: Set(row.product_id),
                            user_id: Set(row.user_id),
                            quantity: Set(row.quantity),
                            total_price: Set(row.total_price),
                            transaction_date: Set(Utc::now().naive_utc()),
                            checkout_id: Set(row.checkout_id),
                        };
                        models.push(model.insert(txn).await?);
                    }

                    Ok(models)
                })
            })
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(inserted)
    }

    async fn delete_by_checkout(&self, checkout_id: Uuid) -> Result<u64, DbError> {
        let result = Transactions::delete_many()
            .filter(transactions::Column::CheckoutId.eq(checkout_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_line(&self, checkout_id: Uuid, product_id: Uuid) -> Result<u64, DbError> {
        let result = Transactions::delete_many()
            .filter(transactions::Column::CheckoutId.eq(checkout_id))
            .filter(transactions::Column::ProductId.eq(product_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}

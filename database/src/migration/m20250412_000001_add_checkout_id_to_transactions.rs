use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Add checkout_id column: groups the rows of one checkout attempt
        // and serves as the idempotency key for client retries.
        // Backfilled rows get the nil uuid; they predate grouped checkouts.
        manager
            .alter_table(
                Table::alter()
                    .table(Transactions::Table)
                    .add_column(
                        ColumnDef::new(Transactions::CheckoutId)
                            .uuid()
                            .not_null()
                            .default("00000000-0000-0000-0000-000000000000"),
                    )
                    .to_owned(),
            )
            .await?;

        // Both the idempotency probe and compensation delete by checkout_id
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_checkout_id")
                    .table(Transactions::Table)
                    .col(Transactions::CheckoutId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop index first
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_checkout_id")
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await?;

        // Drop checkout_id column
        manager
            .alter_table(
                Table::alter()
                    .table(Transactions::Table)
                    .drop_column(Transactions::CheckoutId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    CheckoutId,
}

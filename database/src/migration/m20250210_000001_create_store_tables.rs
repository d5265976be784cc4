use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Check if tables already exist
        if !manager.has_table("products").await? {
            // Create products table
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).text().not_null())
                        .col(ColumnDef::new(Products::Description).text().not_null())
                        .col(ColumnDef::new(Products::Type).text().not_null())
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Create index on product name for catalog search
            manager
                .create_index(
                    Index::create()
                        .name("products_name")
                        .table(Products::Table)
                        .col(Products::Name)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("carts").await? {
            // Create carts table
            manager
                .create_table(
                    Table::create()
                        .table(Carts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Carts::CartId)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Carts::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Carts::UserId).uuid().not_null())
                        .col(ColumnDef::new(Carts::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(Carts::TotalPrice)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Carts::CreatedAt)
                                .timestamp()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Cart lookups are always scoped to the owning user
            manager
                .create_index(
                    Index::create()
                        .name("carts_user_id")
                        .table(Carts::Table)
                        .col(Carts::UserId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("carts_user_id_product_id")
                        .table(Carts::Table)
                        .col(Carts::UserId)
                        .col(Carts::ProductId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("transactions").await? {
            // Create transactions table
            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::TransactionId)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Transactions::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Transactions::UserId).uuid().not_null())
                        .col(ColumnDef::new(Transactions::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(Transactions::TotalPrice)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionDate)
                                .timestamp()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // History is listed newest first
            manager
                .create_index(
                    Index::create()
                        .name("transactions_transaction_date")
                        .table(Transactions::Table)
                        .col(Transactions::TransactionDate)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("transactions_user_id")
                        .table(Transactions::Table)
                        .col(Transactions::UserId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Carts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Products table
#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Type,
    Price,
    Stock,
    CreatedAt,
}

// Carts table
#[derive(DeriveIden)]
enum Carts {
    Table,
    CartId,
    ProductId,
    UserId,
    Quantity,
    TotalPrice,
    CreatedAt,
}

// Transactions table
#[derive(DeriveIden)]
enum Transactions {
    Table,
    TransactionId,
    ProductId,
    UserId,
    Quantity,
    TotalPrice,
    TransactionDate,
}

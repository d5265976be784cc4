//! SeaORM Entity for carts table

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cart_id: Uuid,

    pub product_id: Uuid,
    pub user_id: Uuid,

    // quantity >= 1; enforced by the cart service, not the schema
    pub quantity: i32,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_price: Decimal,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

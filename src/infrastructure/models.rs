use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::aggregate::OrderProductRow;
use crate::schema::orders;

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub account_id: Uuid,
    pub total_price: f64,
}

/// One row of `orders ⨝ order_products`, header columns selected as nullable.
#[derive(Debug, Clone, Queryable)]
pub struct OrderProductJoinRow {
    pub order_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
    pub account_id: Uuid,
    pub total_price: Option<f64>,
    pub product_id: Uuid,
    pub quantity: i64,
}

impl From<OrderProductJoinRow> for OrderProductRow {
    fn from(r: OrderProductJoinRow) -> Self {
        OrderProductRow {
            order_id: r.order_id,
            created_at: r.created_at,
            account_id: r.account_id,
            total_price: r.total_price,
            product_id: r.product_id,
            quantity: r.quantity,
        }
    }
}

//! Reshapes the flat rows of the `orders ⨝ order_products` join into nested
//! [`Order`] values.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Order, OrderedProduct};

/// One row of the header/line-item join.
///
/// Header columns are repeated on every line of the same order. Nullable
/// header columns decode to their zero value instead of failing the read.
#[derive(Debug, Clone)]
pub struct OrderProductRow {
    pub order_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
    pub account_id: Uuid,
    pub total_price: Option<f64>,
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Folds joined rows into one [`Order`] per distinct order id in a single pass.
///
/// Rows of the same order do not need to be adjacent. The returned list has
/// no defined order.
pub fn fold_rows<I>(rows: I) -> Result<Vec<Order>, DomainError>
where
    I: IntoIterator<Item = OrderProductRow>,
{
    let mut orders: HashMap<Uuid, Order> = HashMap::new();

    for row in rows {
        let quantity = u32::try_from(row.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| {
                DomainError::Storage(format!(
                    "order {} has invalid stored quantity {} for product {}",
                    row.order_id, row.quantity, row.product_id
                ))
            })?;

        let order = orders.entry(row.order_id).or_insert_with(|| Order {
            id: row.order_id,
            account_id: row.account_id,
            created_at: row.created_at.unwrap_or_default(),
            total_price: row.total_price.unwrap_or_default(),
            products: Vec::new(),
        });
        order.products.push(OrderedProduct {
            id: row.product_id,
            quantity,
        });
    }

    Ok(orders.into_values().collect())
}

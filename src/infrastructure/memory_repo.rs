use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::aggregate::{fold_rows, OrderProductRow};
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;

#[derive(Debug, Clone)]
struct HeaderRecord {
    id: Uuid,
    created_at: DateTime<Utc>,
    account_id: Uuid,
    total_price: f64,
}

#[derive(Debug, Clone)]
struct LineRecord {
    order_id: Uuid,
    product_id: Uuid,
    quantity: i64,
}

#[derive(Debug, Default)]
struct Tables {
    orders: Vec<HeaderRecord>,
    order_products: Vec<LineRecord>,
}

/// Order store kept in process memory, laid out like the relational tables.
///
/// Writes are staged and published under one lock, so readers never see a
/// header without its line items.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    tables: Mutex<Tables>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of header rows currently stored.
    pub fn order_count(&self) -> usize {
        self.tables
            .lock()
            .expect("order tables lock poisoned")
            .orders
            .len()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|_| DomainError::Storage("order tables lock poisoned".to_string()))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn put(&self, order: &Order) -> Result<(), DomainError> {
        if order.products.is_empty() {
            return Err(DomainError::InvalidParameter(format!(
                "order {} has no products",
                order.id
            )));
        }

        let mut tables = self.lock()?;
        if tables.orders.iter().any(|h| h.id == order.id) {
            return Err(DomainError::Storage(format!(
                "duplicate key value violates unique constraint: order {}",
                order.id
            )));
        }

        let mut staged = Vec::with_capacity(order.products.len());
        for p in &order.products {
            // Mirrors the CHECK (quantity > 0) on order_products.
            if p.quantity == 0 {
                return Err(DomainError::Storage(format!(
                    "quantity of product {} violates check constraint",
                    p.id
                )));
            }
            staged.push(LineRecord {
                order_id: order.id,
                product_id: p.id,
                quantity: i64::from(p.quantity),
            });
        }

        tables.orders.push(HeaderRecord {
            id: order.id,
            created_at: order.created_at,
            account_id: order.account_id,
            total_price: order.total_price,
        });
        tables.order_products.extend(staged);
        Ok(())
    }

    fn orders_for_account(&self, account_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let tables = self.lock()?;
        let lines = &tables.order_products;

        let mut rows: Vec<OrderProductRow> = tables
            .orders
            .iter()
            .filter(|h| h.account_id == account_id)
            .flat_map(|h| {
                lines
                    .iter()
                    .filter(move |l| l.order_id == h.id)
                    .map(move |l| OrderProductRow {
                        order_id: h.id,
                        created_at: Some(h.created_at),
                        account_id: h.account_id,
                        total_price: Some(h.total_price),
                        product_id: l.product_id,
                        quantity: l.quantity,
                    })
            })
            .collect();
        rows.sort_by_key(|r| r.order_id);

        fold_rows(rows)
    }
}

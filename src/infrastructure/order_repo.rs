use std::io::Write;
use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::aggregate::{fold_rows, OrderProductRow};
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::schema::{order_products, orders};

use super::models::{NewOrderRow, OrderProductJoinRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Releases the connection pool. Consuming `self` makes this a one-shot call.
    pub fn close(self) {
        log::info!(
            "Closing order store ({} pooled connections)",
            self.pool.state().connections
        );
        drop(self.pool);
    }

    /// Closes a store that was shared with the service, if this is the last
    /// handle. Returns whether the pool was released.
    pub fn close_shared(store: Arc<Self>) -> bool {
        match Arc::try_unwrap(store) {
            Ok(store) => {
                store.close();
                true
            }
            Err(still_shared) => {
                log::error!(
                    "Order store NOT closed at shutdown: {} other handles still alive",
                    Arc::strong_count(&still_shared) - 1
                );
                false
            }
        }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn put(&self, order: &Order) -> Result<(), DomainError> {
        if order.products.is_empty() {
            return Err(DomainError::InvalidParameter(format!(
                "order {} has no products",
                order.id
            )));
        }

        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;

        // Commits when the closure returns Ok, rolls back on any Err.
        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the header
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order.id,
                    created_at: order.created_at,
                    account_id: order.account_id,
                    total_price: order.total_price,
                })
                .execute(conn)?;

            // 2. Stream the line items through COPY FROM STDIN.
            //    The first line the server rejects aborts the whole COPY.
            let copied = diesel::copy_from(order_products::table)
                .from_raw_data(
                    (
                        order_products::order_id,
                        order_products::product_id,
                        order_products::quantity,
                    ),
                    |copy: &mut dyn Write| {
                        for p in &order.products {
                            writeln!(copy, "{}\t{}\t{}", order.id, p.id, p.quantity)?;
                        }
                        Ok::<_, DomainError>(())
                    },
                )
                .execute(conn)?;

            if copied != order.products.len() {
                return Err(DomainError::Storage(format!(
                    "copied {} line items for order {}, expected {}",
                    copied,
                    order.id,
                    order.products.len()
                )));
            }

            Ok(())
        })
    }

    fn orders_for_account(&self, account_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .inner_join(order_products::table)
            .filter(orders::account_id.eq(account_id))
            .order(orders::id.asc())
            .select((
                orders::id,
                orders::created_at.nullable(),
                orders::account_id,
                orders::total_price.nullable(),
                order_products::product_id,
                order_products::quantity,
            ))
            .load::<OrderProductJoinRow>(&mut conn)?;

        fold_rows(rows.into_iter().map(OrderProductRow::from))
    }
}

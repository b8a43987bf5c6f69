use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Account, Order, OrderedProduct, Product, RequestedProduct};
use crate::domain::ports::{AccountClient, CatalogClient, OrderRepository};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(3);

/// Composes orders from the Account and Catalog services and records them
/// in the order store.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    accounts: Arc<dyn AccountClient>,
    catalog: Arc<dyn CatalogClient>,
    call_timeout: Duration,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        accounts: Arc<dyn AccountClient>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            orders,
            accounts,
            catalog,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the budget of each individual Account/Catalog call.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub async fn create_account(&self, name: &str) -> Result<Account, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidParameter(
                "account name must not be empty".to_string(),
            ));
        }
        self.bounded("account create", self.accounts.create(name))
            .await
    }

    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
        price: f64,
    ) -> Result<Product, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidParameter(
                "product name must not be empty".to_string(),
            ));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::InvalidParameter(format!(
                "product price must be a non-negative number, got {price}"
            )));
        }
        self.bounded("catalog create", self.catalog.create(name, description, price))
            .await
    }

    /// Validates, prices and persists a new order for `account_id`.
    ///
    /// Nothing is persisted unless every step succeeds. Invalid quantities
    /// are rejected before any remote or storage call.
    pub async fn create_order(
        &self,
        account_id: Uuid,
        requested: Vec<RequestedProduct>,
    ) -> Result<Order, DomainError> {
        let products = validate_products(&requested)?;

        let mut ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let (account, catalog) = tokio::try_join!(
            self.bounded("account lookup", self.accounts.lookup_by_id(account_id)),
            self.bounded("catalog lookup", self.catalog.lookup_many(&ids)),
        )?;
        if account.is_none() {
            log::warn!("Account {} could not be resolved", account_id);
            return Err(DomainError::DependencyUnavailable(format!(
                "account {account_id} could not be resolved"
            )));
        }

        let total_price = price_order(&products, &catalog)?;

        let order = Order {
            id: Uuid::new_v4(),
            account_id,
            created_at: Utc::now(),
            total_price,
            products,
        };

        let store = Arc::clone(&self.orders);
        let order = tokio::task::spawn_blocking(move || store.put(&order).map(|()| order))
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?
            .inspect_err(|e| log::error!("Failed to persist order for {}: {}", account_id, e))?;

        log::info!(
            "Created order {} for account {} ({} lines, total {})",
            order.id,
            order.account_id,
            order.products.len(),
            order.total_price
        );
        Ok(order)
    }

    /// Every order of `account_id`, in unspecified order.
    pub async fn orders_for_account(&self, account_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let store = Arc::clone(&self.orders);
        tokio::task::spawn_blocking(move || store.orders_for_account(account_id))
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?
    }

    /// Runs one downstream call under the per-call budget.
    async fn bounded<T, F>(&self, call: &str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e @ DomainError::DependencyUnavailable(_))) => {
                log::warn!("{} failed: {}", call, e);
                Err(e)
            }
            Ok(Err(e)) => {
                log::warn!("{} failed: {}", call, e);
                Err(DomainError::DependencyUnavailable(format!("{call}: {e}")))
            }
            Err(_) => {
                log::warn!("{} timed out after {:?}", call, self.call_timeout);
                Err(DomainError::DependencyUnavailable(format!(
                    "{call} timed out after {:?}",
                    self.call_timeout
                )))
            }
        }
    }
}

/// Checks that there is at least one line and every quantity is a positive
/// `u32`.
pub fn validate_products(requested: &[RequestedProduct]) -> Result<Vec<OrderedProduct>, DomainError> {
    if requested.is_empty() {
        return Err(DomainError::InvalidParameter(
            "an order needs at least one product".to_string(),
        ));
    }
    requested
        .iter()
        .map(|p| {
            u32::try_from(p.quantity)
                .ok()
                .filter(|q| *q > 0)
                .map(|quantity| OrderedProduct { id: p.id, quantity })
                .ok_or_else(|| {
                    DomainError::InvalidParameter(format!(
                        "quantity {} for product {} must be a positive integer",
                        p.quantity, p.id
                    ))
                })
        })
        .collect()
}

/// Sums unit price × quantity over all lines using the catalog snapshot.
pub fn price_order(products: &[OrderedProduct], catalog: &[Product]) -> Result<f64, DomainError> {
    let prices: HashMap<Uuid, f64> = catalog.iter().map(|p| (p.id, p.price)).collect();
    products.iter().try_fold(0.0, |total, line| {
        let price = prices.get(&line.id).ok_or_else(|| {
            DomainError::DependencyUnavailable(format!("product {} has no catalog price", line.id))
        })?;
        Ok(total + price * f64::from(line.quantity))
    })
}

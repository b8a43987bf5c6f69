use async_trait::async_trait;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Account, Order, Product};

/// Durable storage of orders and their line items.
pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the header and every line item of `order` as one atomic unit.
    fn put(&self, order: &Order) -> Result<(), DomainError>;

    /// Returns every order of `account_id` with its full product list.
    ///
    /// The order of the returned list is unspecified; sort explicitly if a
    /// stable sequence is needed. An account without orders yields an empty
    /// list.
    fn orders_for_account(&self, account_id: Uuid) -> Result<Vec<Order>, DomainError>;
}

#[async_trait]
pub trait AccountClient: Send + Sync + 'static {
    async fn create(&self, name: &str) -> Result<Account, DomainError>;
    async fn lookup_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;
}

#[async_trait]
pub trait CatalogClient: Send + Sync + 'static {
    async fn create(
        &self,
        name: &str,
        description: &str,
        price: f64,
    ) -> Result<Product, DomainError>;

    /// Resolves the given ids; ids unknown to the catalog are simply absent
    /// from the result.
    async fn lookup_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
}

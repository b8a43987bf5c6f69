//! In-process stand-ins for the Account and Catalog services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Account, Product};
use crate::domain::ports::{AccountClient, CatalogClient};

/// Shared knobs for the fake services: call counting, latency, and outages.
#[derive(Debug, Default)]
struct Behaviour {
    calls: AtomicUsize,
    unavailable: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl Behaviour {
    async fn enter(&self, service: &str) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().expect("fake delay lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::DependencyUnavailable(format!(
                "{service} service is unavailable"
            )));
        }
        Ok(())
    }

    fn set_delay(&self, delay: Duration) {
        *self.delay.lock().expect("fake delay lock poisoned") = Some(delay);
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAccountClient {
    accounts: Mutex<HashMap<Uuid, Account>>,
    behaviour: Behaviour,
}

impl InMemoryAccountClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account directly, without counting a call.
    pub fn insert(&self, name: &str) -> Account {
        let account = Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.accounts
            .lock()
            .expect("fake accounts lock poisoned")
            .insert(account.id, account.clone());
        account
    }

    pub fn calls(&self) -> usize {
        self.behaviour.calls.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.behaviour.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.behaviour.set_delay(delay);
    }
}

#[async_trait]
impl AccountClient for InMemoryAccountClient {
    async fn create(&self, name: &str) -> Result<Account, DomainError> {
        self.behaviour.enter("account").await?;
        Ok(self.insert(name))
    }

    async fn lookup_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        self.behaviour.enter("account").await?;
        let accounts = self.accounts.lock().expect("fake accounts lock poisoned");
        Ok(accounts.get(&id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogClient {
    products: Mutex<HashMap<Uuid, Product>>,
    behaviour: Behaviour,
}

impl InMemoryCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product directly, without counting a call.
    pub fn insert(&self, name: &str, description: &str, price: f64) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            price,
        };
        self.products
            .lock()
            .expect("fake catalog lock poisoned")
            .insert(product.id, product.clone());
        product
    }

    /// Changes the listed price of an existing product.
    pub fn reprice(&self, id: Uuid, price: f64) {
        let mut products = self.products.lock().expect("fake catalog lock poisoned");
        if let Some(product) = products.get_mut(&id) {
            product.price = price;
        }
    }

    pub fn calls(&self) -> usize {
        self.behaviour.calls.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.behaviour.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.behaviour.set_delay(delay);
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogClient {
    async fn create(
        &self,
        name: &str,
        description: &str,
        price: f64,
    ) -> Result<Product, DomainError> {
        self.behaviour.enter("catalog").await?;
        Ok(self.insert(name, description, price))
    }

    async fn lookup_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        self.behaviour.enter("catalog").await?;
        let products = self.products.lock().expect("fake catalog lock poisoned");
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }
}

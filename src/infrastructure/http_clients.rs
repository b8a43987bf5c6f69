//! JSON-over-HTTP clients for the Account and Catalog services.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Account, Product};
use crate::domain::ports::{AccountClient, CatalogClient};

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::DependencyUnavailable(e.to_string())
    }
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[derive(Clone)]
pub struct HttpAccountClient {
    http: Client,
    base_url: String,
}

impl HttpAccountClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl AccountClient for HttpAccountClient {
    async fn create(&self, name: &str) -> Result<Account, DomainError> {
        let account = self
            .http
            .post(format!("{}/accounts", self.base_url))
            .json(&json!({ "name": name }))
            .send()
            .await?
            .error_for_status()?
            .json::<Account>()
            .await?;
        Ok(account)
    }

    async fn lookup_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let resp = self
            .http
            .get(format!("{}/accounts/{}", self.base_url, id))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let account = resp.error_for_status()?.json::<Account>().await?;
        Ok(Some(account))
    }
}

#[derive(Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn create(
        &self,
        name: &str,
        description: &str,
        price: f64,
    ) -> Result<Product, DomainError> {
        let product = self
            .http
            .post(format!("{}/products", self.base_url))
            .json(&json!({
                "name": name,
                "description": description,
                "price": price
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<Product>()
            .await?;
        Ok(product)
    }

    async fn lookup_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let ids = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let products = self
            .http
            .get(format!("{}/products", self.base_url))
            .query(&[("ids", ids)])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Product>>()
            .await?;
        Ok(products)
    }
}

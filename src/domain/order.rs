use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of an order: a catalog product and how many of it were ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedProduct {
    pub id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Price snapshot taken from the catalog when the order was created.
    pub total_price: f64,
    pub products: Vec<OrderedProduct>,
}

/// A product line as requested by a client, before validation.
///
/// The quantity is signed because inbound payloads may carry zero or
/// negative values; those are rejected before any remote call.
#[derive(Debug, Clone, Copy)]
pub struct RequestedProduct {
    pub id: Uuid,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
}

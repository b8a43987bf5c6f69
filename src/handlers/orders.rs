use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::OrderService;
use crate::domain::order::{Order, RequestedProduct};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderProductRequest {
    pub id: Uuid,
    /// Must be a positive integer.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub account_id: Uuid,
    pub products: Vec<OrderProductRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub created_at: String,
    pub total_price: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderedProductResponse {
    pub id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub created_at: String,
    pub total_price: f64,
    pub products: Vec<OrderedProductResponse>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            account_id: o.account_id,
            created_at: o.created_at.to_rfc3339(),
            total_price: o.total_price,
            products: o
                .products
                .into_iter()
                .map(|p| OrderedProductResponse {
                    id: p.id,
                    quantity: p.quantity,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Prices the requested products against the catalog, checks the account
/// and records the order with all of its lines in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "A quantity is not a positive integer"),
        (status = 502, description = "Account or catalog service failed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let requested = body
        .products
        .iter()
        .map(|p| RequestedProduct {
            id: p.id,
            quantity: p.quantity,
        })
        .collect();

    let order = service.create_order(body.account_id, requested).await?;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        id: order.id,
        created_at: order.created_at.to_rfc3339(),
        total_price: order.total_price,
    }))
}

/// GET /accounts/{id}/orders
///
/// Returns every order of the account with its products, oldest first.
#[utoipa::path(
    get,
    path = "/accounts/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Account UUID"),
    ),
    responses(
        (status = 200, description = "Orders of the account", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_account_orders(
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();

    let mut orders = service.orders_for_account(account_id).await?;
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let items: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

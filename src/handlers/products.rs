use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::OrderService;
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Empty name or invalid price"),
        (status = 502, description = "Catalog service failed"),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<OrderService>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = service
        .create_product(&body.name, &body.description, body.price)
        .await?;
    Ok(HttpResponse::Created().json(product))
}

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::OrderService;
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub name: String,
}

/// POST /accounts
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Empty name"),
        (status = 502, description = "Account service failed"),
    ),
    tag = "accounts"
)]
pub async fn create_account(
    service: web::Data<OrderService>,
    body: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    let account = service.create_account(&body.name).await?;
    Ok(HttpResponse::Created().json(account))
}

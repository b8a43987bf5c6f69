//! HTTP-level tests: the actix app wired to in-memory order store, account
//! service and catalog service.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use futures::future::join_all;
use order_orchestrator::domain::order::RequestedProduct;
use order_orchestrator::handlers::orders::{CreateOrderResponse, OrderResponse};
use order_orchestrator::infrastructure::memory_clients::{
    InMemoryAccountClient, InMemoryCatalogClient,
};
use order_orchestrator::infrastructure::memory_repo::InMemoryOrderRepository;
use order_orchestrator::{configure, OrderService};
use serde_json::{json, Value};
use uuid::Uuid;

struct Fixture {
    orders: Arc<InMemoryOrderRepository>,
    accounts: Arc<InMemoryAccountClient>,
    catalog: Arc<InMemoryCatalogClient>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            orders: Arc::new(InMemoryOrderRepository::new()),
            accounts: Arc::new(InMemoryAccountClient::new()),
            catalog: Arc::new(InMemoryCatalogClient::new()),
        }
    }

    fn service(&self) -> web::Data<OrderService> {
        web::Data::new(
            OrderService::new(
                self.orders.clone(),
                self.accounts.clone(),
                self.catalog.clone(),
            )
            .with_call_timeout(Duration::from_millis(200)),
        )
    }
}

#[actix_web::test]
async fn create_order_returns_id_timestamp_and_total() {
    let fx = Fixture::new();
    let account = fx.accounts.insert("alice");
    let pen = fx.catalog.insert("pen", "blue", 10.0);
    let pad = fx.catalog.insert("pad", "A5", 5.5);
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({
            "account_id": account.id,
            "products": [
                { "id": pen.id, "quantity": 2 },
                { "id": pad.id, "quantity": 1 }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: CreateOrderResponse = test::read_body_json(resp).await;
    assert_eq!(body.total_price, 25.5);
    assert!(!body.created_at.is_empty());
    assert_eq!(fx.orders.order_count(), 1);
}

#[actix_web::test]
async fn zero_quantity_is_a_bad_request_with_no_side_effects() {
    let fx = Fixture::new();
    let account = fx.accounts.insert("alice");
    let pen = fx.catalog.insert("pen", "blue", 10.0);
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({
            "account_id": account.id,
            "products": [{ "id": pen.id, "quantity": 0 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fx.accounts.calls(), 0);
    assert_eq!(fx.catalog.calls(), 0);
    assert_eq!(fx.orders.order_count(), 0);
}

#[actix_web::test]
async fn quantity_above_i32_range_is_accepted_and_listed() {
    let fx = Fixture::new();
    let account = fx.accounts.insert("alice");
    let bolt = fx.catalog.insert("bolt", "M3", 0.5);
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({
            "account_id": account.id,
            "products": [{ "id": bolt.id, "quantity": 3_000_000_000_i64 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: CreateOrderResponse = test::read_body_json(resp).await;
    assert_eq!(body.total_price, 1_500_000_000.0);

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/{}/orders", account.id))
        .to_request();
    let listed: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].products[0].quantity, 3_000_000_000);
}

#[actix_web::test]
async fn quantity_beyond_u32_is_rejected_before_remote_calls() {
    let fx = Fixture::new();
    let account = fx.accounts.insert("alice");
    let bolt = fx.catalog.insert("bolt", "M3", 0.5);
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({
            "account_id": account.id,
            "products": [{ "id": bolt.id, "quantity": 5_000_000_000_i64 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fx.accounts.calls(), 0);
    assert_eq!(fx.catalog.calls(), 0);
    assert_eq!(fx.orders.order_count(), 0);
}

#[actix_web::test]
async fn catalog_outage_is_a_bad_gateway() {
    let fx = Fixture::new();
    let account = fx.accounts.insert("alice");
    let pen = fx.catalog.insert("pen", "blue", 10.0);
    fx.catalog.set_unavailable(true);
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/orders")
        .set_json(json!({
            "account_id": account.id,
            "products": [{ "id": pen.id, "quantity": 1 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some());
    assert_eq!(fx.orders.order_count(), 0);
}

#[actix_web::test]
async fn account_without_orders_lists_empty() {
    let fx = Fixture::new();
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/{}/orders", Uuid::new_v4()))
        .to_request();
    let body: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;

    assert!(body.is_empty());
}

#[actix_web::test]
async fn concurrent_orders_are_listed_with_their_own_products() {
    let fx = Fixture::new();
    let account = fx.accounts.insert("alice");
    let pen = fx.catalog.insert("pen", "blue", 1.0);
    let pad = fx.catalog.insert("pad", "A5", 2.0);
    let service = fx.service();

    let results = join_all(vec![
        service.create_order(
            account.id,
            vec![RequestedProduct { id: pen.id, quantity: 3 }],
        ),
        service.create_order(
            account.id,
            vec![
                RequestedProduct { id: pad.id, quantity: 1 },
                RequestedProduct { id: pen.id, quantity: 2 },
            ],
        ),
    ])
    .await;
    let created: Vec<_> = results
        .into_iter()
        .map(|r| r.expect("create failed"))
        .collect();

    let app = test::init_service(App::new().app_data(service.clone()).configure(configure)).await;
    let req = test::TestRequest::get()
        .uri(&format!("/accounts/{}/orders", account.id))
        .to_request();
    let listed: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed.len(), 2);
    for expected in &created {
        let actual = listed
            .iter()
            .find(|o| o.id == expected.id)
            .expect("order missing from listing");
        assert_eq!(actual.products.len(), expected.products.len());
        assert_eq!(actual.total_price, expected.total_price);
    }
    // Listing is sorted oldest first.
    let parse = |s: &str| chrono::DateTime::parse_from_rfc3339(s).expect("rfc3339 timestamp");
    assert!(parse(&listed[0].created_at) <= parse(&listed[1].created_at));
}

#[actix_web::test]
async fn accounts_and_products_are_created_through_the_services() {
    let fx = Fixture::new();
    let app = test::init_service(App::new().app_data(fx.service()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/accounts")
        .set_json(json!({ "name": "carol" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let account: Value = test::read_body_json(resp).await;
    assert_eq!(account["name"], "carol");

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({ "name": "mug", "description": "white", "price": 4.25 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = test::read_body_json(resp).await;
    assert_eq!(product["price"], 4.25);

    let req = test::TestRequest::post()
        .uri("/accounts")
        .set_json(json!({ "name": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

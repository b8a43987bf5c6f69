use std::env;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use order_orchestrator::infrastructure::http_clients::{HttpAccountClient, HttpCatalogClient};
use order_orchestrator::infrastructure::order_repo::DieselOrderRepository;
use order_orchestrator::{build_server, create_pool, run_migrations, OrderService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let account_url = env::var("ACCOUNT_SERVICE_URL").expect("ACCOUNT_SERVICE_URL must be set");
    let catalog_url = env::var("CATALOG_SERVICE_URL").expect("CATALOG_SERVICE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let call_timeout = env::var("DOWNSTREAM_TIMEOUT_MS")
        .ok()
        .map(|ms| ms.parse::<u64>().expect("DOWNSTREAM_TIMEOUT_MS must be a number"))
        .map(Duration::from_millis)
        .unwrap_or(order_orchestrator::application::order_service::DEFAULT_CALL_TIMEOUT);

    let pool = create_pool(&database_url).expect("Failed to create database connection pool");
    run_migrations(&pool).expect("Failed to run database migrations");

    let http = reqwest::Client::new();
    let orders = Arc::new(DieselOrderRepository::new(pool));
    let service = OrderService::new(
        orders.clone(),
        Arc::new(HttpAccountClient::new(http.clone(), &account_url)),
        Arc::new(HttpCatalogClient::new(http, &catalog_url)),
    )
    .with_call_timeout(call_timeout);

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(service, &host, port)?.await?;

    DieselOrderRepository::close_shared(orders);
    Ok(())
}

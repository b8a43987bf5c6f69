pub mod http_clients;
pub mod memory_clients;
pub mod memory_repo;
pub mod models;
pub mod order_repo;

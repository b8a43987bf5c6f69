pub mod aggregate;
pub mod errors;
pub mod order;
pub mod ports;

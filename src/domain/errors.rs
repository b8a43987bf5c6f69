use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

//! Infrastructure-specific error types

use sms_core::errors::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection pool no longer hands out permits
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// Operation exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InfrastructureError {
    pub fn into_store_read(self) -> DomainError {
        DomainError::store_read(self.to_string())
    }

    pub fn into_store_write(self) -> DomainError {
        DomainError::store_write(self.to_string())
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}

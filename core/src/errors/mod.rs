//! Domain error taxonomy and its mapping onto envelope codes.

use sms_shared::error_codes;
use thiserror::Error;

/// Core domain errors
///
/// Every variant maps to a stable numeric envelope code through
/// [`DomainError::code`]; provider failures carry the provider's own code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Cooldown or max-attempts rejection; the message is a wait hint
    #[error("{message}")]
    RateLimit { message: String },

    #[error("{message}")]
    StoreWrite { message: String },

    #[error("{message}")]
    StoreRead { message: String },

    #[error("{message}")]
    NotFound { message: String },

    /// Network failure or vendor-reported failure
    #[error("{message}")]
    Provider {
        code: i32,
        message: String,
        reference: String,
    },

    #[error("Token invalid or expired")]
    Token,

    #[error("Invalid provider: {name}")]
    InvalidProvider { name: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }

    pub fn store_write(message: impl Into<String>) -> Self {
        DomainError::StoreWrite {
            message: message.into(),
        }
    }

    pub fn store_read(message: impl Into<String>) -> Self {
        DomainError::StoreRead {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound {
            message: message.into(),
        }
    }

    /// Envelope code for this error
    pub fn code(&self) -> i32 {
        match self {
            DomainError::Validation { .. } => error_codes::INVALID_INPUT,
            DomainError::RateLimit { .. } => error_codes::RATE_LIMITED,
            DomainError::StoreWrite { .. } => error_codes::STORE_WRITE,
            DomainError::StoreRead { .. } => error_codes::STORE_READ,
            DomainError::NotFound { .. } | DomainError::Token => error_codes::NOT_FOUND,
            DomainError::Provider { code, .. } => *code,
            DomainError::InvalidProvider { .. } | DomainError::Unauthorized => {
                error_codes::UNAUTHORIZED
            }
            DomainError::Internal { .. } => error_codes::INTERNAL,
        }
    }

    /// Opaque detail carried in the envelope `data` field
    pub fn data(&self) -> &str {
        match self {
            DomainError::Provider { reference, .. } => reference,
            _ => "",
        }
    }

    /// Whether the failure originates from the key-value store
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            DomainError::StoreWrite { .. } | DomainError::StoreRead { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;

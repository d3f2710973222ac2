use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a cart data source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cart source unavailable: {message}")]
    Unavailable { message: String },

    #[error("Cart source returned invalid data: {message}")]
    InvalidData { message: String },

    #[error("Item not found")]
    NotFound,

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Timeout occurred during source operation")]
    Timeout,
}

/// Failure surfaced through cart state; the only channel through which data
/// source problems reach a consumer
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CartFailure {
    #[error("Failed to load cart: {message}")]
    Load { message: String },

    #[error("Failed to remove item {item_id}: {message}")]
    Removal { item_id: String, message: String },
}

impl CartFailure {
    pub fn load(source: &SourceError) -> Self {
        CartFailure::Load {
            message: source.to_string(),
        }
    }

    pub fn removal(item_id: &str, source: &SourceError) -> Self {
        CartFailure::Removal {
            item_id: item_id.to_string(),
            message: source.to_string(),
        }
    }
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },
}

/// Result type alias for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

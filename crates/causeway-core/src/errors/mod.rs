//! Error taxonomy. `CausewayError` is returned across crate boundaries;
//! storage and causal failures are wrapped unchanged.

mod causal_error;
mod storage_error;

pub use causal_error::CausalError;
pub use storage_error::StorageError;

/// Top-level error for every causeway operation.
#[derive(Debug, thiserror::Error)]
pub enum CausewayError {
    #[error("component not found: {id}")]
    ComponentNotFound { id: String },

    #[error("invalid status: {status}")]
    InvalidStatus { status: String },

    #[error("invalid component call: {reason}")]
    InvalidCall { reason: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    CausalError(#[from] CausalError),
}

/// Convenience alias used throughout the workspace.
pub type CausewayResult<T> = Result<T, CausewayError>;

//! Error types for backend translation and parsing.
//!
//! Capability rejections ([`BridgeError::Unsupported`]) are kept apart from
//! schema rejections: a tree can be fully valid and still use something a
//! given backend cannot express.

use slash_schema_core::{BackendId, SchemaError};
use thiserror::Error;

/// Errors raised at the backend boundary.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The tree uses a value or feature the backend can't express.
    #[error("{backend} doesn't support {what}")]
    Unsupported { backend: BackendId, what: String },

    /// A node identifier didn't resolve in the tree being translated.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A wire payload is malformed beyond what parsing can tolerate.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// JSON decoding of a wire payload failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;

//! Error types for schema mutations.
//!
//! Every rejected mutation surfaces as one [`SchemaError`]. The variant names
//! the kind of rule that was broken; the payload is the human-readable detail
//! (e.g. `name for locale fr must not exceed 32 characters`).

use thiserror::Error;

/// Rejection of a mutation on a [`SchemaTree`](crate::SchemaTree).
///
/// A rejected mutation never leaves partial state behind: the tree is exactly
/// as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A name fails the pattern or case rule, or a text field is blank.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A string exceeds its field's maximum, or a collection exceeds its cap.
    #[error("length exceeded: {0}")]
    LengthExceeded(String),

    /// Two siblings would share a name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// Sibling type homogeneity or nesting legality is violated.
    #[error("incompatible type: {0}")]
    IncompatibleType(String),

    /// Required options would follow a non-required option.
    #[error("order violation: {0}")]
    OrderViolation(String),

    /// A bound is set on a type it is not gated to, is inverted, or is out of range.
    #[error("bounds violation: {0}")]
    BoundsViolation(String),

    /// Static choices and autocomplete were both requested.
    #[error("mutual exclusion violation: {0}")]
    MutualExclusionViolation(String),

    /// A choice's type or value disagrees with its declared type or its owner.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A node already belongs to a different parent.
    #[error("already attached: {0}")]
    AlreadyAttached(String),

    /// An identifier was issued by another tree or refers to a discarded node.
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;

//! Error types for the eskdraft library

use thiserror::Error;

/// Main error type for eskdraft operations
#[derive(Debug, Error)]
pub enum DraftError {
    /// The host reported the entity as a proxy (not fully loaded).
    ///
    /// Expected during certain host states (xref overlays); callers are
    /// supposed to swallow it and keep going.
    #[error("entity is a proxy and not fully loaded")]
    ProxyEntity,

    /// A parameter name is not part of the entity kind's schema
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// A parameter value does not have the type the schema declares
    #[error("parameter {name} expects a {expected} value")]
    ParameterType {
        name: String,
        expected: &'static str,
    },

    /// A numeric parameter is outside its schema range
    #[error("parameter {name} out of range: {value}")]
    ParameterRange { name: String, value: f64 },

    /// Error parsing an extended-data record
    #[error("extended data parse error: {0}")]
    XdataParse(String),

    /// Extended-data record written by an unsupported library version
    #[error("unsupported extended data version: {0}")]
    UnsupportedVersion(i16),

    /// Extended-data record carries an unknown entity kind tag
    #[error("unknown entity kind tag: {0}")]
    UnknownKind(String),

    /// A grip refers to a control point that does not exist
    #[error("grip index {index} out of range (entity has {count} control points)")]
    GripIndex { index: usize, count: usize },

    /// A grip operation is not available for the entity kind
    #[error("grip not supported by entity kind: {0}")]
    GripUnsupported(String),

    /// The entity is in a state the operation cannot work with
    #[error("invalid entity state: {0}")]
    InvalidState(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for eskdraft operations
pub type Result<T> = std::result::Result<T, DraftError>;

impl From<String> for DraftError {
    fn from(s: String) -> Self {
        DraftError::Custom(s)
    }
}

impl From<&str> for DraftError {
    fn from(s: &str) -> Self {
        DraftError::Custom(s.to_string())
    }
}

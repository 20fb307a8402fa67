use thiserror::Error;

use crate::address::PathAddress;

/// Result type alias using TransformError
pub type Result<T> = std::result::Result<T, TransformError>;

/// Error taxonomy for transformation operations
///
/// A transformation failure aborts the remainder of the chain for the
/// current unit only; sibling and child transformations are unaffected.
/// Silent discards are not errors and never appear here. Construction-time
/// misconfiguration surfaces at tree-build time, never at call time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Discard policy returned Reject for an operation
    #[error("Operation '{operation}' rejected at {address}")]
    OperationRejected {
        operation: String,
        address: PathAddress,
    },

    /// Discard policy returned Reject for a resource
    #[error("Resource rejected at {address}")]
    ResourceRejected { address: PathAddress },

    /// An explicit operation transformer was registered twice for one name
    #[error("Operation transformer already registered for '{operation}'")]
    DuplicateOperationTransformer { operation: String },

    /// A required operation parameter was absent
    #[error("Operation '{operation}' is missing required parameter '{parameter}'")]
    MissingParameter {
        operation: String,
        parameter: String,
    },

    /// A relative navigation named a child resource that does not exist
    #[error("No child resource at {address}")]
    NoSuchChild { address: PathAddress },

    /// Attribute value encoding/decoding failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TransformError {
    /// Get the stable error code for this error
    ///
    /// Codes are part of the external contract: programmatic handlers and
    /// structured log events key on them, not on display strings.
    pub fn code(&self) -> &'static str {
        match self {
            TransformError::OperationRejected { .. } => "ERR_OPERATION_REJECTED",
            TransformError::ResourceRejected { .. } => "ERR_RESOURCE_REJECTED",
            TransformError::DuplicateOperationTransformer { .. } => {
                "ERR_DUPLICATE_OPERATION_TRANSFORMER"
            }
            TransformError::MissingParameter { .. } => "ERR_MISSING_PARAMETER",
            TransformError::NoSuchChild { .. } => "ERR_NO_SUCH_CHILD",
            TransformError::Serialization { .. } => "ERR_SERIALIZATION",
            TransformError::Internal { .. } => "ERR_INTERNAL",
        }
    }
}

/// Conversion from serde_json::Error to TransformError
impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Serialization {
            message: err.to_string(),
        }
    }
}

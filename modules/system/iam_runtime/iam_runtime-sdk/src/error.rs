//! Error types for the IAM runtime module.

use thiserror::Error;

/// Request-time errors returned by the IAM runtime API.
///
/// Startup failures (malformed policy, missing or duplicate credentials) are
/// reported by the implementing plugin and never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IamRuntimeError {
    /// The presented credential does not belong to any subject.
    #[error("invalid credential")]
    Unauthenticated,

    /// The subject is not granted `action` on `resource_id`.
    #[error("subject does not have permission to perform '{action}' on resource '{resource_id}'")]
    PermissionDenied {
        /// The denied action.
        action: String,
        /// The resource the action was requested on.
        resource_id: String,
    },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IamRuntimeError {
    /// Convenience constructor for [`IamRuntimeError::PermissionDenied`].
    #[must_use]
    pub fn permission_denied(action: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
            resource_id: resource_id.into(),
        }
    }
}

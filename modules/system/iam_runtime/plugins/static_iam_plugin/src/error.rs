//! Error types for the static IAM plugin.

use iam_runtime_sdk::IamRuntimeError;
use thiserror::Error;

/// Startup errors: loading the policy document and building the credential
/// table. Every variant is fatal; no partial state survives it.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The document is not well-formed or does not match the expected shape.
    #[error("malformed policy document: {0}")]
    Format(String),

    /// The document stream could not be read.
    #[error("failed to read policy document: {0}")]
    Io(#[from] std::io::Error),

    /// A subject declares the same resource identifier more than once.
    #[error("{subject_id}: resource '{resource_id}' is declared more than once")]
    DuplicateResource {
        subject_id: String,
        resource_id: String,
    },

    /// A credential source resolved to an empty value.
    #[error("{subject_id}: {env_var}: missing credential value")]
    MissingValue { subject_id: String, env_var: String },

    /// A credential source resolved to a value already bound to a subject.
    #[error("{subject_id}: {env_var}: duplicate credential value")]
    DuplicateValue { subject_id: String, env_var: String },
}

/// The presented credential is not in the credential table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("credential not recognized")]
pub struct AuthenticationFailure;

impl From<AuthenticationFailure> for IamRuntimeError {
    fn from(_: AuthenticationFailure) -> Self {
        Self::Unauthenticated
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn build_errors_name_subject_and_source() {
        let err = PolicyError::MissingValue {
            subject_id: "svc-a".to_owned(),
            env_var: "TOKEN_A".to_owned(),
        };
        assert_eq!(err.to_string(), "svc-a: TOKEN_A: missing credential value");

        let err = PolicyError::DuplicateValue {
            subject_id: "svc-b".to_owned(),
            env_var: "TOKEN_B".to_owned(),
        };
        assert_eq!(err.to_string(), "svc-b: TOKEN_B: duplicate credential value");
    }

    #[test]
    fn authentication_failure_maps_to_unauthenticated() {
        let err: IamRuntimeError = AuthenticationFailure.into();
        assert_eq!(err, IamRuntimeError::Unauthenticated);
    }
}

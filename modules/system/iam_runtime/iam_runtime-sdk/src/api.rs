//! API traits for IAM runtime implementations.
//!
//! Both traits are synchronous: implementations answer from immutable
//! in-memory state and never suspend. Transport adapters (gRPC) hold them as
//! `Arc<dyn ...>` and call them from async handlers directly.

use crate::error::IamRuntimeError;
use crate::models::{AccessRequest, SubjectClaims};

/// Authentication contract: credential in, subject claims out.
pub trait AuthenticationApi: Send + Sync {
    /// Resolve an opaque bearer credential to the claims of its subject.
    ///
    /// Matching is exact; there is no partial or fuzzy lookup.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the credential is not known
    fn authenticate_subject(&self, credential: &str) -> Result<SubjectClaims, IamRuntimeError>;
}

/// Authorization contract: credential plus a batch of requested actions.
pub trait AuthorizationApi: Send + Sync {
    /// Check that the subject behind `credential` may perform every requested
    /// action.
    ///
    /// Pairs are evaluated in order and evaluation stops at the first denied
    /// pair. An empty batch succeeds once the credential authenticates.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the credential is not known
    /// - `PermissionDenied` carrying the first pair that is not granted
    fn check_access(
        &self,
        credential: &str,
        actions: &[AccessRequest],
    ) -> Result<(), IamRuntimeError>;
}

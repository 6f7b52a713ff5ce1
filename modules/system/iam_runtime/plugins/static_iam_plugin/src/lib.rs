//! Static IAM Runtime Plugin
//!
//! Authenticates pre-shared bearer credentials and checks coarse-grained
//! `(action, resource)` grants declared in a static policy document.
//! Useful for testing, development, and simple deployments.
//!
//! ## Policy document
//!
//! ```yaml
//! subjects:
//!   - id: svc-a
//!     tokens:
//!       - envVar: TOKEN_A
//!     resources:
//!       - id: db1
//!         actions: [read]
//! ```
//!
//! Credential values are never part of the document: each `envVar` names the
//! environment variable holding the secret. Values are resolved once when the
//! [`CredentialTable`] is built and must be non-empty and unique.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod error;

pub use config::{CredentialSource, PolicyDocument, PolicyResource, PolicySubject};
pub use domain::{
    CredentialTable, EnvSecretResolver, SecretResolver, Service, authorize, check_access,
};
pub use error::{AuthenticationFailure, PolicyError};

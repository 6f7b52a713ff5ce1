//! IAM Runtime SDK
//!
//! This crate provides the public API for the `iam_runtime` module:
//!
//! - [`AuthenticationApi`] - resolves a bearer credential into subject claims
//! - [`AuthorizationApi`] - checks a batch of `(action, resource)` pairs for a credential
//! - [`SubjectClaims`], [`AccessRequest`] - Domain models
//! - [`IamRuntimeError`] - Request-time error types
//!
//! ## Usage
//!
//! ```ignore
//! use iam_runtime_sdk::{AccessRequest, AuthenticationApi, AuthorizationApi};
//!
//! let claims = runtime.authenticate_subject(credential)?;
//! assert_eq!(claims.subject(), Some("svc-a"));
//!
//! runtime.check_access(credential, &[AccessRequest::new("read", "db1")])?;
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

pub use api::{AuthenticationApi, AuthorizationApi};
pub use error::IamRuntimeError;
pub use models::{AccessRequest, SUBJECT_CLAIM, SubjectClaims};

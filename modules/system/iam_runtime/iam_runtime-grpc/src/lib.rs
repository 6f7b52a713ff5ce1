//! gRPC transport for the IAM runtime.
//!
//! - Generated protobuf types and service stubs (`iam.runtime.v1`)
//! - [`AuthenticationServiceImpl`] / [`AuthorizationServiceImpl`]: tonic services
//!   delegating to the SDK API traits
//! - [`ListenAddr`] and [`serve`]: a single tonic server over TCP or a Unix
//!   domain socket, stopped by a cancellation token

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

mod listen;
mod server;

/// Generated protobuf types for the `iam.runtime.v1` package.
pub mod proto {
    tonic::include_proto!("iam.runtime.v1");
}

pub use proto::authentication_client::AuthenticationClient;
pub use proto::authentication_server::{Authentication, AuthenticationServer};
pub use proto::authorization_client::AuthorizationClient;
pub use proto::authorization_server::{Authorization, AuthorizationServer};
pub use proto::{
    AccessRequestAction, AuthenticateSubjectRequest, AuthenticateSubjectResponse,
    CheckAccessRequest, CheckAccessResponse,
};

pub use listen::{ListenAddr, ListenAddrError, serve, serve_with_listener};
pub use server::{
    AuthenticationServiceImpl, AuthorizationServiceImpl, DENIED_ACTION_METADATA_KEY,
    DENIED_RESOURCE_METADATA_KEY, routes, status_from_error,
};

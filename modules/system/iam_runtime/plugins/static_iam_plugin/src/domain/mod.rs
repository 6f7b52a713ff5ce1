//! Decision engine: credential table build, authentication and access checks.

mod access;
mod secret;
mod service;
mod table;

pub use access::{authorize, check_access};
pub use secret::{EnvSecretResolver, SecretResolver};
pub use service::Service;
pub use table::CredentialTable;

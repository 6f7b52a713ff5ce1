//! Credential value resolution.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::config::CredentialSource;

/// Resolves a [`CredentialSource`] to its current secret value.
///
/// An empty string means "no value"; the table build rejects it.
pub trait SecretResolver {
    fn resolve(&self, source: &CredentialSource) -> String;
}

/// Reads credential values from the process environment.
///
/// Unset and non-UTF-8 variables resolve to an empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretResolver;

impl SecretResolver for EnvSecretResolver {
    fn resolve(&self, source: &CredentialSource) -> String {
        std::env::var(&source.env_var).unwrap_or_default()
    }
}

/// Fixed values keyed by environment variable name.
impl<S: BuildHasher> SecretResolver for HashMap<String, String, S> {
    fn resolve(&self, source: &CredentialSource) -> String {
        self.get(&source.env_var).cloned().unwrap_or_default()
    }
}

/// Any `Fn(&CredentialSource) -> String`, e.g. a lookup into an external store.
impl<F> SecretResolver for F
where
    F: Fn(&CredentialSource) -> String,
{
    fn resolve(&self, source: &CredentialSource) -> String {
        self(source)
    }
}

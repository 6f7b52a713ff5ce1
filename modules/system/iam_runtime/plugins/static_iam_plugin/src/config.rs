//! Policy document model.
//!
//! The document is parsed once at startup and handed to
//! [`CredentialTable::build`](crate::domain::CredentialTable::build).
//! Parsing only checks the document's shape; cross-subject rules (non-empty,
//! unique credential values) need the resolved secrets and are enforced by
//! the build step.

use std::collections::HashSet;
use std::io::{self, Read};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::PolicyError;

/// Root of the policy document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    /// Subjects in declaration order.
    pub subjects: Vec<PolicySubject>,
}

/// One principal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySubject {
    /// Stable subject identifier, returned as the `sub` claim.
    pub id: String,

    /// Credential sources; any of them authenticates this subject.
    pub tokens: Vec<CredentialSource>,

    /// Resource grants. A subject without grants can authenticate but is
    /// denied every action.
    #[serde(default)]
    pub resources: Vec<PolicyResource>,
}

/// Where a credential value lives. Never holds the secret itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialSource {
    /// Name of the environment variable holding the credential.
    #[serde(rename = "envVar")]
    pub env_var: String,
}

/// A protected resource as seen by one subject.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyResource {
    /// Resource identifier.
    pub id: String,

    /// Allowed action names, matched exactly.
    pub actions: Vec<String>,
}

impl PolicyDocument {
    /// Read a document from `reader` until EOF and parse it.
    ///
    /// Accepts YAML, and therefore JSON.
    ///
    /// # Errors
    ///
    /// - `Io` if reading the stream fails
    /// - `Format` if the input is not UTF-8, not well-formed, or does not match
    ///   the document shape
    /// - `DuplicateResource` if a subject declares a resource id twice
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, PolicyError> {
        let mut source = String::new();
        reader.read_to_string(&mut source).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                PolicyError::Format(e.to_string())
            } else {
                PolicyError::Io(e)
            }
        })?;
        source.parse()
    }

    /// Total number of declared credential sources across all subjects.
    #[must_use]
    pub fn credential_count(&self) -> usize {
        self.subjects.iter().map(|s| s.tokens.len()).sum()
    }

    fn reject_duplicate_resources(&self) -> Result<(), PolicyError> {
        for subject in &self.subjects {
            let mut seen = HashSet::new();
            for resource in &subject.resources {
                if !seen.insert(resource.id.as_str()) {
                    return Err(PolicyError::DuplicateResource {
                        subject_id: subject.id.clone(),
                        resource_id: resource.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromStr for PolicyDocument {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let document: Self =
            serde_saphyr::from_str(s).map_err(|e| PolicyError::Format(e.to_string()))?;
        document.reject_duplicate_resources()?;
        Ok(document)
    }
}

impl PolicySubject {
    /// First resource declared with `resource_id`.
    #[must_use]
    pub fn resource(&self, resource_id: &str) -> Option<&PolicyResource> {
        self.resources.iter().find(|r| r.id == resource_id)
    }
}

impl PolicyResource {
    /// Whether `action` is one of the allowed actions.
    #[must_use]
    pub fn allows(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}

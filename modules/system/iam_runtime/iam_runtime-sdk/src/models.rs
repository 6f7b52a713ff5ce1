//! Domain models for the IAM runtime module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Claim key carrying the authenticated subject identifier.
pub const SUBJECT_CLAIM: &str = "sub";

/// Claims describing an authenticated subject.
///
/// Always contains [`SUBJECT_CLAIM`] when produced by a successful
/// authentication. Keys are kept ordered so that serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectClaims(BTreeMap<String, String>);

impl SubjectClaims {
    /// Claims carrying only the subject identifier.
    #[must_use]
    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        let mut claims = BTreeMap::new();
        claims.insert(SUBJECT_CLAIM.to_owned(), subject_id.into());
        Self(claims)
    }

    /// The subject identifier, if present.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get(SUBJECT_CLAIM)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single `(action, resource)` pair in an authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Action name, matched exactly.
    pub action: String,
    /// Resource identifier, matched exactly.
    pub resource_id: String,
}

impl AccessRequest {
    #[must_use]
    pub fn new(action: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource_id: resource_id.into(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn for_subject_sets_sub_claim() {
        let claims = SubjectClaims::for_subject("svc-a");
        assert_eq!(claims.subject(), Some("svc-a"));
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn claims_serialize_as_flat_map() {
        let claims = SubjectClaims::for_subject("svc-a");
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json, serde_json::json!({ "sub": "svc-a" }));
    }

    #[test]
    fn claims_iterate_as_pairs() {
        let claims = SubjectClaims::for_subject("svc-a");
        let pairs: Vec<_> = claims.iter().collect();
        assert_eq!(pairs, vec![("sub", "svc-a")]);
        assert_eq!(claims.get("aud"), None);
    }
}

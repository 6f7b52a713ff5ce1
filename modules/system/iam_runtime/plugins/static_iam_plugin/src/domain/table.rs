//! Credential table: resolved credential value to owning subject.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use crate::config::{PolicyDocument, PolicySubject};
use crate::domain::secret::SecretResolver;
use crate::error::{AuthenticationFailure, PolicyError};

/// Immutable index from credential value to subject.
///
/// Built once at startup; there is no API to add, remove or replace entries
/// afterwards, so it can be shared across request handlers without locking.
pub struct CredentialTable {
    /// Subjects are shared by every credential that authenticates them.
    subjects: HashMap<String, Arc<PolicySubject>>,
    subject_count: usize,
}

impl CredentialTable {
    /// Resolve every credential source of `document` and index the subjects
    /// by credential value.
    ///
    /// Subjects and their sources are visited in declaration order, so the
    /// reported error always names the first offending source.
    ///
    /// # Errors
    ///
    /// - `MissingValue` if a source resolves to an empty value
    /// - `DuplicateValue` if a source resolves to a value already in the table
    pub fn build(
        document: PolicyDocument,
        resolver: &dyn SecretResolver,
    ) -> Result<Self, PolicyError> {
        let subject_count = document.subjects.len();
        let mut subjects = HashMap::with_capacity(document.credential_count());

        for subject in document.subjects {
            let subject = Arc::new(subject);

            for source in &subject.tokens {
                let value = resolver.resolve(source);
                if value.is_empty() {
                    return Err(PolicyError::MissingValue {
                        subject_id: subject.id.clone(),
                        env_var: source.env_var.clone(),
                    });
                }

                match subjects.entry(value) {
                    Entry::Occupied(_) => {
                        return Err(PolicyError::DuplicateValue {
                            subject_id: subject.id.clone(),
                            env_var: source.env_var.clone(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(Arc::clone(&subject));
                    }
                }
            }
        }

        tracing::info!(
            subjects = subject_count,
            credentials = subjects.len(),
            "credential table built"
        );

        Ok(Self {
            subjects,
            subject_count,
        })
    }

    /// Exact-match lookup of `credential`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailure` if no subject owns the credential.
    pub fn authenticate(&self, credential: &str) -> Result<&PolicySubject, AuthenticationFailure> {
        self.subjects
            .get(credential)
            .map(Arc::as_ref)
            .ok_or(AuthenticationFailure)
    }

    /// Number of credentials in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Number of subjects in the source document, including subjects that
    /// declare no credentials.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subject_count
    }
}

// Keys are secrets: only subject ids are printed.
impl fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.subjects.values().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        f.debug_struct("CredentialTable")
            .field("credentials", &self.subjects.len())
            .field("subjects", &ids)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::CredentialSource;

    fn secrets(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn document(yaml: &str) -> PolicyDocument {
        yaml.parse().unwrap()
    }

    const TWO_SUBJECTS: &str = r"
subjects:
  - id: svc-a
    tokens: [{ envVar: TOKEN_A }, { envVar: TOKEN_A_NEXT }]
    resources: [{ id: db1, actions: [read] }]
  - id: svc-b
    tokens: [{ envVar: TOKEN_B }]
";

    #[test]
    fn build_indexes_every_source() {
        let resolver = secrets(&[
            ("TOKEN_A", "abc123"),
            ("TOKEN_A_NEXT", "abc456"),
            ("TOKEN_B", "xyz789"),
        ]);
        let table = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.subject_count(), 2);
        assert_eq!(table.authenticate("abc123").unwrap().id, "svc-a");
        assert_eq!(table.authenticate("abc456").unwrap().id, "svc-a");
        assert_eq!(table.authenticate("xyz789").unwrap().id, "svc-b");
    }

    #[test]
    fn authenticate_unknown_credential_fails() {
        let resolver = secrets(&[
            ("TOKEN_A", "abc123"),
            ("TOKEN_A_NEXT", "abc456"),
            ("TOKEN_B", "xyz789"),
        ]);
        let table = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap();

        assert_eq!(table.authenticate("wrong"), Err(AuthenticationFailure));
        assert_eq!(table.authenticate(""), Err(AuthenticationFailure));
        // no prefix or case-insensitive matching
        assert_eq!(table.authenticate("abc"), Err(AuthenticationFailure));
        assert_eq!(table.authenticate("ABC123"), Err(AuthenticationFailure));
    }

    #[test]
    fn build_fails_on_missing_value() {
        let resolver = secrets(&[("TOKEN_A", "abc123"), ("TOKEN_B", "xyz789")]);
        let err = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap_err();

        match err {
            PolicyError::MissingValue {
                subject_id,
                env_var,
            } => {
                assert_eq!(subject_id, "svc-a");
                assert_eq!(env_var, "TOKEN_A_NEXT");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn build_fails_on_value_shared_across_subjects() {
        let resolver = secrets(&[
            ("TOKEN_A", "shared-secret"),
            ("TOKEN_A_NEXT", "abc456"),
            ("TOKEN_B", "shared-secret"),
        ]);
        let err = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap_err();

        match err {
            PolicyError::DuplicateValue {
                subject_id,
                env_var,
            } => {
                assert_eq!(subject_id, "svc-b");
                assert_eq!(env_var, "TOKEN_B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn build_fails_on_value_shared_within_subject() {
        let resolver = secrets(&[
            ("TOKEN_A", "abc123"),
            ("TOKEN_A_NEXT", "abc123"),
            ("TOKEN_B", "xyz789"),
        ]);
        let err = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::DuplicateValue { ref env_var, .. } if env_var == "TOKEN_A_NEXT"
        ));
    }

    #[test]
    fn build_through_closure_resolver() {
        let resolver = |s: &CredentialSource| format!("v-{}", s.env_var);
        let table = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.authenticate("v-TOKEN_A_NEXT").unwrap().id, "svc-a");
        assert_eq!(table.authenticate("v-TOKEN_B").unwrap().id, "svc-b");
    }

    #[test]
    fn subject_without_tokens_is_unreachable() {
        let doc = document(
            r"
subjects:
  - id: orphan
    tokens: []
",
        );
        let table = CredentialTable::build(doc, &secrets(&[])).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.subject_count(), 1);
    }

    #[test]
    #[tracing_test::traced_test]
    fn build_logs_counts_without_values() {
        let resolver = secrets(&[
            ("TOKEN_A", "abc123"),
            ("TOKEN_A_NEXT", "abc456"),
            ("TOKEN_B", "xyz789"),
        ]);
        CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap();

        assert!(logs_contain("credential table built"));
        assert!(logs_contain("credentials=3"));
        assert!(!logs_contain("abc123"));
    }

    #[test]
    fn debug_does_not_contain_credentials() {
        let resolver = secrets(&[
            ("TOKEN_A", "abc123"),
            ("TOKEN_A_NEXT", "abc456"),
            ("TOKEN_B", "xyz789"),
        ]);
        let table = CredentialTable::build(document(TWO_SUBJECTS), &resolver).unwrap();
        let dbg = format!("{table:?}");

        assert!(dbg.contains("svc-a"));
        assert!(!dbg.contains("abc123"), "Debug must not contain secrets");
        assert!(!dbg.contains("xyz789"), "Debug must not contain secrets");
    }
}

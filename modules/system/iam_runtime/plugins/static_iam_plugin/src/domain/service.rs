//! Domain service for the static IAM plugin.

use iam_runtime_sdk::{
    AccessRequest, AuthenticationApi, AuthorizationApi, IamRuntimeError, SubjectClaims,
};

use crate::config::PolicyDocument;
use crate::domain::access::authorize;
use crate::domain::secret::SecretResolver;
use crate::domain::table::CredentialTable;
use crate::error::PolicyError;

/// Static IAM service.
///
/// Owns the credential table for the process lifetime and answers both API
/// contracts from it. Wrap in an `Arc` to share between request handlers.
#[derive(Debug)]
pub struct Service {
    table: CredentialTable,
}

impl Service {
    #[must_use]
    pub fn new(table: CredentialTable) -> Self {
        Self { table }
    }

    /// Build the credential table from `document` and wrap it.
    ///
    /// # Errors
    ///
    /// Propagates `MissingValue` and `DuplicateValue` from the table build.
    pub fn from_policy(
        document: PolicyDocument,
        resolver: &dyn SecretResolver,
    ) -> Result<Self, PolicyError> {
        CredentialTable::build(document, resolver).map(Self::new)
    }

    #[must_use]
    pub fn table(&self) -> &CredentialTable {
        &self.table
    }
}

impl AuthenticationApi for Service {
    fn authenticate_subject(&self, credential: &str) -> Result<SubjectClaims, IamRuntimeError> {
        let subject = self.table.authenticate(credential)?;
        Ok(SubjectClaims::for_subject(subject.id.as_str()))
    }
}

impl AuthorizationApi for Service {
    fn check_access(
        &self,
        credential: &str,
        actions: &[AccessRequest],
    ) -> Result<(), IamRuntimeError> {
        let subject = self.table.authenticate(credential)?;
        authorize(subject, actions)
    }
}

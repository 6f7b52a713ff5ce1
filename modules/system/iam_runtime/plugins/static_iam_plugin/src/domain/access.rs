//! Access checks against a subject's declared grants.
//!
//! Linear scans: subjects carry small, bounded grant lists.

use iam_runtime_sdk::{AccessRequest, IamRuntimeError};

use crate::config::PolicySubject;

/// Whether `subject` may perform `action` on `resource_id`.
///
/// Finds the first resource declared with `resource_id` and matches `action`
/// exactly against its allowed actions. Unknown resources are denied.
#[must_use]
pub fn check_access(subject: &PolicySubject, action: &str, resource_id: &str) -> bool {
    subject
        .resource(resource_id)
        .is_some_and(|resource| resource.allows(action))
}

/// Evaluate a batch of requests in order, stopping at the first denial.
///
/// # Errors
///
/// Returns `PermissionDenied` for the first request that is not granted.
pub fn authorize(
    subject: &PolicySubject,
    requests: &[AccessRequest],
) -> Result<(), IamRuntimeError> {
    match requests
        .iter()
        .find(|req| !check_access(subject, &req.action, &req.resource_id))
    {
        Some(denied) => Err(IamRuntimeError::permission_denied(
            denied.action.clone(),
            denied.resource_id.clone(),
        )),
        None => Ok(()),
    }
}

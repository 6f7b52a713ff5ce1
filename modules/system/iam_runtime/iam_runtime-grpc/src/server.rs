//! gRPC service implementations.
//!
//! Handlers log request receipt, delegate to the API traits and translate
//! request-time errors into status codes. Decisions are not logged here.

use std::sync::Arc;

use iam_runtime_sdk::{AccessRequest, AuthenticationApi, AuthorizationApi, IamRuntimeError};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::{Routes, RoutesBuilder};
use tonic::{Request, Response, Status};

use crate::proto::authentication_server::{Authentication, AuthenticationServer};
use crate::proto::authorization_server::{Authorization, AuthorizationServer};
use crate::proto::{
    AccessRequestAction, AuthenticateSubjectRequest, AuthenticateSubjectResponse,
    CheckAccessRequest, CheckAccessResponse,
};

/// Metadata key carrying the denied action on `PERMISSION_DENIED`.
pub const DENIED_ACTION_METADATA_KEY: &str = "iam-denied-action";

/// Metadata key carrying the denied resource id on `PERMISSION_DENIED`.
pub const DENIED_RESOURCE_METADATA_KEY: &str = "iam-denied-resource-id";

/// Map a request-time error to a gRPC status.
///
/// `PermissionDenied` also carries the offending pair in the status metadata
/// when both values are valid ASCII metadata.
#[must_use]
pub fn status_from_error(err: &IamRuntimeError) -> Status {
    match err {
        IamRuntimeError::Unauthenticated => Status::unauthenticated(err.to_string()),
        IamRuntimeError::PermissionDenied {
            action,
            resource_id,
        } => {
            let mut status = Status::permission_denied(err.to_string());
            if let (Ok(action), Ok(resource_id)) = (
                action.parse::<MetadataValue<Ascii>>(),
                resource_id.parse::<MetadataValue<Ascii>>(),
            ) {
                let meta = status.metadata_mut();
                meta.insert(DENIED_ACTION_METADATA_KEY, action);
                meta.insert(DENIED_RESOURCE_METADATA_KEY, resource_id);
            }
            status
        }
        IamRuntimeError::Internal(_) => Status::internal(err.to_string()),
    }
}

/// Authentication service wrapping an [`AuthenticationApi`].
#[derive(Clone)]
pub struct AuthenticationServiceImpl {
    api: Arc<dyn AuthenticationApi>,
}

impl AuthenticationServiceImpl {
    #[must_use]
    pub fn new(api: Arc<dyn AuthenticationApi>) -> Self {
        Self { api }
    }
}

#[tonic::async_trait]
impl Authentication for AuthenticationServiceImpl {
    async fn authenticate_subject(
        &self,
        request: Request<AuthenticateSubjectRequest>,
    ) -> Result<Response<AuthenticateSubjectResponse>, Status> {
        tracing::info!("received AuthenticateSubject request");

        let req = request.into_inner();
        let claims = self
            .api
            .authenticate_subject(&req.credential)
            .map_err(|e| status_from_error(&e))?;

        Ok(Response::new(AuthenticateSubjectResponse {
            subject_claims: claims
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }))
    }
}

/// Authorization service wrapping an [`AuthorizationApi`].
#[derive(Clone)]
pub struct AuthorizationServiceImpl {
    api: Arc<dyn AuthorizationApi>,
}

impl AuthorizationServiceImpl {
    #[must_use]
    pub fn new(api: Arc<dyn AuthorizationApi>) -> Self {
        Self { api }
    }
}

#[tonic::async_trait]
impl Authorization for AuthorizationServiceImpl {
    async fn check_access(
        &self,
        request: Request<CheckAccessRequest>,
    ) -> Result<Response<CheckAccessResponse>, Status> {
        tracing::info!("received CheckAccess request");

        let req = request.into_inner();
        let actions: Vec<AccessRequest> = req
            .actions
            .into_iter()
            .map(|AccessRequestAction { action, resource_id }| AccessRequest {
                action,
                resource_id,
            })
            .collect();

        self.api
            .check_access(&req.credential, &actions)
            .map_err(|e| status_from_error(&e))?;

        Ok(Response::new(CheckAccessResponse {}))
    }
}

/// Routes serving both services from the same runtime instance.
#[must_use]
pub fn routes(
    authentication: Arc<dyn AuthenticationApi>,
    authorization: Arc<dyn AuthorizationApi>,
) -> Routes {
    let mut builder = RoutesBuilder::default();
    builder
        .add_service(AuthenticationServer::new(AuthenticationServiceImpl::new(
            authentication,
        )))
        .add_service(AuthorizationServer::new(AuthorizationServiceImpl::new(
            authorization,
        )));
    builder.routes()
}

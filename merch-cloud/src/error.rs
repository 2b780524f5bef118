//! Unified service-layer error type for merch-cloud
//!
//! `ServiceError` bridges repository errors (`RepoError`) and the API-layer
//! error (`AppError`) so services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;

/// Service-layer error
///
/// - `Repo`: persistence failure (logged, mapped by kind)
/// - `App`: business-rule error (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    App(AppError),
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        ServiceError::Repo(e)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Repo(e.into())
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Repo(RepoError::NotFound(what)) => {
                AppError::with_message(ErrorCode::NotFound, format!("{what} not found"))
            }
            ServiceError::Repo(RepoError::Duplicate(key)) => {
                AppError::conflict("Resource already exists").with_detail("constraint", key)
            }
            ServiceError::Repo(RepoError::Database(msg)) => {
                tracing::error!(error = %msg, "Service database error");
                AppError::new(ErrorCode::InternalError).with_cause(msg)
            }
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Repo(e) => write!(f, "{e}"),
            ServiceError::App(e) => write!(f, "{e}"),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

//! Quality Error Types
//!
//! This module provides quality-gate error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Quality-specific result type alias
pub type QualityResult<T> = Result<T, QualityError>;

#[derive(Debug, Error)]
pub enum QualityError {
    /// No runbook with this slug
    #[error("Runbook not found")]
    RunbookNotFound(String),

    /// Catalog could not be loaded or read
    #[error("Runbook catalog error: {0}")]
    Catalog(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QualityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            QualityError::RunbookNotFound(_) => StatusCode::NOT_FOUND,
            QualityError::Catalog(_) | QualityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QualityError::RunbookNotFound(_) => ErrorKind::NotFound,
            QualityError::Catalog(_) | QualityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Carries an `error` member (and `slug` for lookups) alongside the
    /// problem-details fields.
    pub fn to_app_error(&self) -> AppError {
        match self {
            QualityError::RunbookNotFound(slug) => AppError::new(self.kind(), self.to_string())
                .with_extension("error", self.to_string())
                .with_extension("slug", slug.clone()),
            _ => AppError::new(self.kind(), "Quality data unavailable")
                .with_extension("error", "Quality data unavailable"),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            QualityError::RunbookNotFound(slug) => {
                tracing::debug!(slug = %slug, "Runbook not found");
            }
            QualityError::Catalog(msg) => {
                tracing::error!(message = %msg, "Runbook catalog error");
            }
            QualityError::Internal(msg) => {
                tracing::error!(message = %msg, "Quality internal error");
            }
        }
    }
}

impl IntoResponse for QualityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<QualityError> for AppError {
    fn from(err: QualityError) -> Self {
        err.to_app_error()
    }
}

impl From<std::io::Error> for QualityError {
    fn from(err: std::io::Error) -> Self {
        QualityError::Catalog(err.to_string())
    }
}

impl From<serde_json::Error> for QualityError {
    fn from(err: serde_json::Error) -> Self {
        QualityError::Catalog(format!("Invalid runbook JSON: {err}"))
    }
}

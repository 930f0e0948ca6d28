//! Access Error Types
//!
//! This module provides access-control error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Access-specific result type alias
pub type AccessResult<T> = Result<T, AccessError>;

/// Access-specific error variants
///
/// Denials carry a stable reason code (see [`AccessError::reason`]) that the
/// status endpoint and redirects expose to the frontend.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No signing secret configured
    #[error("Missing ACCESS_TOKEN_SECRET (or NEXTAUTH_SECRET)")]
    MissingSecret,

    /// No access cookie on the request
    #[error("No access token")]
    TokenMissing,

    /// Signature, structure or expiry check failed
    #[error("Invalid or expired access token")]
    TokenInvalid,

    /// Token is on the deny-list
    #[error("Token revoked")]
    TokenRevoked,

    /// Subscription plan without a subscription id
    #[error("Subscription id missing")]
    SubscriptionIdMissing,

    /// Checkout session not paid yet
    #[error("Checkout not completed")]
    CheckoutIncomplete,

    /// Checkout session carries no customer
    #[error("Checkout has no customer")]
    CustomerMissing,

    /// Subscription exists but does not authorize access
    #[error("Subscription inactive")]
    SubscriptionInactive,

    /// Subscription lookup failed
    #[error("Subscription check failed: {0}")]
    SubscriptionSource(String),

    /// Request could not be processed as given
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccessError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::MissingSecret | AccessError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AccessError::TokenMissing
            | AccessError::TokenInvalid
            | AccessError::TokenRevoked
            | AccessError::SubscriptionIdMissing => StatusCode::UNAUTHORIZED,
            AccessError::SubscriptionInactive => StatusCode::FORBIDDEN,
            AccessError::SubscriptionSource(_) => StatusCode::SERVICE_UNAVAILABLE,
            AccessError::CheckoutIncomplete
            | AccessError::CustomerMissing
            | AccessError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::MissingSecret | AccessError::Internal(_) => {
                ErrorKind::InternalServerError
            }
            AccessError::TokenMissing
            | AccessError::TokenInvalid
            | AccessError::TokenRevoked
            | AccessError::SubscriptionIdMissing => ErrorKind::Unauthorized,
            AccessError::SubscriptionInactive => ErrorKind::Forbidden,
            AccessError::SubscriptionSource(_) => ErrorKind::ServiceUnavailable,
            AccessError::CheckoutIncomplete
            | AccessError::CustomerMissing
            | AccessError::InvalidRequest(_) => ErrorKind::BadRequest,
        }
    }

    /// Stable denial reason code, `None` for faults
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AccessError::TokenMissing => Some("no_token"),
            AccessError::TokenInvalid => Some("invalid_token"),
            AccessError::TokenRevoked => Some("token_revoked"),
            AccessError::SubscriptionIdMissing => Some("no_subscription_id"),
            AccessError::SubscriptionInactive => Some("subscription_inactive"),
            AccessError::SubscriptionSource(_) => Some("subscription_check_failed"),
            AccessError::MissingSecret
            | AccessError::CheckoutIncomplete
            | AccessError::CustomerMissing
            | AccessError::InvalidRequest(_)
            | AccessError::Internal(_) => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.public_message());
        match self.reason() {
            Some(reason) => err.with_extension("reason", reason),
            None => err,
        }
    }

    /// Message safe to show to callers
    fn public_message(&self) -> String {
        match self {
            AccessError::MissingSecret | AccessError::Internal(_) => {
                "Access control is misconfigured".to_string()
            }
            AccessError::SubscriptionSource(_) => "Subscription check failed".to_string(),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AccessError::MissingSecret => {
                tracing::error!("Access token secret is not configured");
            }
            AccessError::Internal(msg) => {
                tracing::error!(message = %msg, "Access internal error");
            }
            AccessError::SubscriptionSource(msg) => {
                tracing::error!(message = %msg, "Subscription lookup failed");
            }
            AccessError::TokenRevoked => {
                tracing::warn!("Revoked access token presented");
            }
            AccessError::TokenInvalid => {
                tracing::warn!("Invalid access token presented");
            }
            _ => {
                tracing::debug!(error = %self, "Access denied");
            }
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        err.to_app_error()
    }
}

impl From<platform::crypto::CryptoError> for AccessError {
    fn from(err: platform::crypto::CryptoError) -> Self {
        AccessError::Internal(err.to_string())
    }
}

//! Security Check Error Types
//!
//! Every rejection of the check pipeline, mapped onto the unified
//! `kernel::error::AppError` system. Bodies keep an `error` member next to
//! the problem-details fields.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::circuit_breaker::CircuitState;
use platform::payload::PayloadError;
use platform::rate_limit::LimitTier;
use thiserror::Error;

use crate::presentation::dto::headers::{X_RATELIMIT_REMAINING, X_RATELIMIT_RESET};

/// Security-check result type alias
pub type CheckResult<T> = Result<T, CheckError>;

fn rate_limit_message(tier: &LimitTier) -> &'static str {
    match tier {
        LimitTier::Hard => "Too many requests from your IP. Please try again later.",
        LimitTier::Soft => "Rate limit exceeded. Please slow down.",
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    /// Body failed size, shape, depth, injection or field checks
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// `target` is blank after trimming
    #[error("Please enter an IP or domain")]
    EmptyTarget,

    /// Presented access token is on the deny-list
    #[error("Token revoked")]
    TokenRevoked,

    #[error("{}", rate_limit_message(.tier))]
    RateLimited {
        tier: LimitTier,
        retry_after_secs: u64,
        reset_at_secs: i64,
    },

    /// Breaker refused the call
    #[error("Service temporarily limited. Please try again in a moment.")]
    CircuitOpen(CircuitState),

    /// The assessment itself failed
    #[error("Assessment failed: {0}")]
    Assessment(String),
}

impl CheckError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckError::Payload(e) => e.status_code(),
            CheckError::EmptyTarget => StatusCode::BAD_REQUEST,
            CheckError::TokenRevoked => StatusCode::UNAUTHORIZED,
            CheckError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            CheckError::CircuitOpen(_) => StatusCode::SERVICE_UNAVAILABLE,
            CheckError::Assessment(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::Payload(PayloadError::TooLarge { .. }) => ErrorKind::PayloadTooLarge,
            CheckError::Payload(
                PayloadError::InvalidJson | PayloadError::NotAnObject | PayloadError::MissingField(_),
            )
            | CheckError::EmptyTarget => ErrorKind::BadRequest,
            CheckError::Payload(_) => ErrorKind::UnprocessableEntity,
            CheckError::TokenRevoked => ErrorKind::Unauthorized,
            CheckError::RateLimited { .. } => ErrorKind::TooManyRequests,
            CheckError::CircuitOpen(_) => ErrorKind::ServiceUnavailable,
            CheckError::Assessment(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            CheckError::Assessment(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let err = AppError::new(self.kind(), message.clone()).with_extension("error", message);

        match self {
            CheckError::TokenRevoked => err.with_extension("reason", "token_revoked"),
            CheckError::RateLimited {
                tier,
                retry_after_secs,
                ..
            } => err
                .with_retry_after(*retry_after_secs)
                .with_extension("retryAfter", *retry_after_secs)
                .with_extension("limitedBy", tier.as_str()),
            CheckError::CircuitOpen(state) => err
                .with_extension("degraded", true)
                .with_extension("circuitState", state.as_str()),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            CheckError::Assessment(msg) => {
                tracing::error!(message = %msg, "Security check failed");
            }
            CheckError::CircuitOpen(state) => {
                tracing::warn!(circuit_state = %state, "Security check degraded");
            }
            CheckError::TokenRevoked => {
                tracing::warn!("Revoked access token presented to security check");
            }
            CheckError::RateLimited { tier, .. } => {
                tracing::info!(tier = tier.as_str(), "Security check rate limited");
            }
            _ => {
                tracing::debug!(error = %self, "Security check request rejected");
            }
        }
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        self.log();
        let mut response = self.to_app_error().into_response();
        if let CheckError::RateLimited { reset_at_secs, .. } = self {
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
            headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at_secs));
        }
        response
    }
}

impl From<CheckError> for AppError {
    fn from(err: CheckError) -> Self {
        err.to_app_error()
    }
}

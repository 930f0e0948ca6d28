//! Access (Paid Access Control) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Token payload, plans, store traits
//! - `application/` - Signing and access use cases
//! - `infra/` - In-memory deny-list, subscription sources
//! - `presentation/` - HTTP handlers, middleware, router
//!
//! ## Security Model
//! - Access tokens are stateless: `base64url(payload).base64url(HMAC-SHA256)`
//! - Signatures are compared in constant time before the payload is parsed
//! - Revoked tokens are tracked by signature suffix until their own expiry
//! - Subscription plans are re-checked against the billing provider on access
//! - Deny-list failures refuse the token

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AccessConfig;
pub use application::token::{HmacTokenSigner, SharedSigner, TokenSigner};
pub use error::{AccessError, AccessResult};
pub use infra::{InMemoryRevocationStore, StaticSubscriptionSource, StripeSubscriptionSource};
pub use presentation::AccessAppState;
pub use presentation::router::access_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;

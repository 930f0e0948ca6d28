//! Domain Layer
//!
//! Contains entities, value objects, and store traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AccessGrant, AccessInfo, AccessTokenPayload};
pub use repository::{RevocationStore, SubscriptionSource};
pub use value_object::{AccessPlan, SubscriptionStatus, TokenId};

//! Infrastructure Layer
//!
//! Store implementations.

pub mod memory;
pub mod stripe;

pub use memory::{InMemoryRevocationStore, StaticSubscriptionSource};
pub use stripe::StripeSubscriptionSource;

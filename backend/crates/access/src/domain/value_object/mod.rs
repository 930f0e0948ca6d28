//! Value Object Module

pub mod access_plan;
pub mod subscription_status;
pub mod token_id;

pub use access_plan::AccessPlan;
pub use subscription_status::SubscriptionStatus;
pub use token_id::TokenId;

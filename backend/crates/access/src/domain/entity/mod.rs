//! Entity Module

pub mod access_grant;
pub mod access_token;
pub mod checkout_session;

pub use access_grant::{AccessGrant, AccessInfo};
pub use access_token::{AccessTokenPayload, TOKEN_VERSION};
pub use checkout_session::{CheckoutSession, is_valid_session_id};

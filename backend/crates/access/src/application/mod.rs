//! Application Layer
//!
//! Use cases and application services.

pub mod activate;
pub mod check_access;
pub mod config;
pub mod issue_token;
pub mod recover;
pub mod revoke;
pub mod token;

// Re-exports
pub use activate::{ActivateAccessOutput, ActivateAccessUseCase};
pub use check_access::CheckAccessUseCase;
pub use config::AccessConfig;
pub use issue_token::{IssueAccessTokenInput, IssueAccessTokenOutput, IssueAccessTokenUseCase};
pub use recover::{RecoverAccessOutput, RecoverAccessUseCase};
pub use revoke::{LOGOUT_REASON, RevokeTokenUseCase};
pub use token::{HmacTokenSigner, SharedSigner, TokenSigner};

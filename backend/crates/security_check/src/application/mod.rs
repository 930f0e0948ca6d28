//! Application Layer
//!
//! Use cases and their configuration.

pub mod check_target;
pub mod config;

// Re-exports
pub use check_target::{CheckTargetInput, CheckTargetOutput, CheckTargetUseCase};
pub use config::SecurityCheckConfig;

//! Presentation Layer
//!
//! HTTP handler, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::SecurityCheckAppState;
pub use router::security_check_router;

//! Shared Kernel - Cross-crate error vocabulary
//!
//! This crate contains the smallest core every feature crate agrees on:
//! - The HTTP-mapped error classification ([`error::kind::ErrorKind`])
//! - The unified application error ([`error::app_error::AppError`])
//! - Conversions from common library errors
//!
//! Feature crates (`access`, `quality`, `security_check`) keep their own
//! `thiserror` enums and convert into [`error::app_error::AppError`] at the edge.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}

//! Infrastructure Layer
//!
//! Catalog implementations.

pub mod memory;

pub use memory::InMemoryRunbookCatalog;

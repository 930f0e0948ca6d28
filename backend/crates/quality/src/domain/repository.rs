//! Catalog Traits
//!
//! Source of runbook records. The in-memory implementation lives in the
//! infrastructure layer.

use std::sync::Arc;

use crate::domain::entity::Runbook;
use crate::error::QualityResult;

/// Runbook catalog
#[trait_variant::make(RunbookCatalog: Send)]
pub trait LocalRunbookCatalog {
    /// Every record, in catalog order
    async fn list(&self) -> QualityResult<Arc<[Runbook]>>;

    /// Record by exact slug
    async fn find(&self, slug: &str) -> QualityResult<Option<Runbook>>;
}

//! In-Memory Runbook Catalog
//!
//! Records are loaded once (typically from the JSON file at `RUNBOOKS_PATH`)
//! and served read-only.

use std::path::Path;
use std::sync::Arc;

use crate::application::config::QualityConfig;
use crate::domain::entity::Runbook;
use crate::domain::repository::RunbookCatalog;
use crate::error::QualityResult;

#[derive(Debug, Clone)]
pub struct InMemoryRunbookCatalog {
    runbooks: Arc<[Runbook]>,
}

impl InMemoryRunbookCatalog {
    pub fn new(runbooks: Vec<Runbook>) -> Self {
        Self {
            runbooks: runbooks.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a JSON array of runbook records
    pub fn from_json_str(json: &str) -> QualityResult<Self> {
        let runbooks: Vec<Runbook> = serde_json::from_str(json)?;
        Ok(Self::new(runbooks))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> QualityResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), runbooks = catalog.len(), "Runbook catalog loaded");
        Ok(catalog)
    }

    /// Catalog from `config.runbooks_path`, empty when unset
    pub fn from_config(config: &QualityConfig) -> QualityResult<Self> {
        match &config.runbooks_path {
            Some(path) => Self::from_json_file(path),
            None => {
                tracing::warn!("RUNBOOKS_PATH not set, quality endpoints serve an empty catalog");
                Ok(Self::empty())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.runbooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runbooks.is_empty()
    }
}

impl RunbookCatalog for InMemoryRunbookCatalog {
    async fn list(&self) -> QualityResult<Arc<[Runbook]>> {
        Ok(self.runbooks.clone())
    }

    async fn find(&self, slug: &str) -> QualityResult<Option<Runbook>> {
        Ok(self.runbooks.iter().find(|r| r.slug == slug).cloned())
    }
}

//! Thread-safe handle around one `PipelineService`.
//!
//! # Invariants
//! - Mutations hold the write lock for their whole cascade.
//! - Reads never observe a half-applied mutation.
//! - Workbook import parses outside the lock and swaps under it.

use crate::repo::store::EntityStore;
use crate::service::pipeline_service::PipelineService;
use crate::tabular::workbook::import_workbook;
use crate::tabular::{TabularError, TabularResult};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Cloneable single-writer / many-reader handle.
#[derive(Debug, Clone, Default)]
pub struct SharedPipeline {
    inner: Arc<RwLock<PipelineService>>,
}

impl SharedPipeline {
    pub fn new(service: PipelineService) -> Self {
        Self {
            inner: Arc::new(RwLock::new(service)),
        }
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&PipelineService) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut PipelineService) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Clones the current store.
    pub fn snapshot(&self) -> EntityStore {
        self.inner.read().store().clone()
    }

    /// Imports a workbook and swaps it in, all or nothing.
    pub fn load_workbook(&self, path: impl AsRef<Path>) -> TabularResult<()> {
        let store = import_workbook(path)?;
        self.inner
            .write()
            .replace_store(store)
            .map_err(TabularError::Integrity)
    }
}

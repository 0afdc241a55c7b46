//! Load-once cache of a catalog source.
//!
//! # Thread Safety
//!
//! The slot is a `parking_lot` `RwLock`, so any number of readers can share
//! the loaded catalog while at most one caller performs the load. The cache
//! is never invalidated on its own; call [`CatalogCache::invalidate`] when
//! the source file changes.

use crate::catalog::LoadedCatalog;
use crate::error::Result;
use crate::loader::load_catalog;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct CatalogCache {
    source: PathBuf,
    slot: RwLock<Option<Arc<LoadedCatalog>>>,
}

static_assertions::assert_impl_all!(CatalogCache: Send, Sync);

impl CatalogCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            slot: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The cached catalog, loading it first if needed.
    ///
    /// A failed load leaves the cache empty so the next call retries.
    pub fn get_or_load(&self) -> Result<Arc<LoadedCatalog>> {
        if let Some(loaded) = self.slot.read().as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let mut slot = self.slot.write();
        // Another caller may have loaded while we waited for the lock
        if let Some(loaded) = slot.as_ref() {
            return Ok(Arc::clone(loaded));
        }

        debug!("Catalog cache miss for {}", self.source.display());
        let loaded = Arc::new(load_catalog(&self.source)?);
        *slot = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drop the cached catalog; the next [`get_or_load`](Self::get_or_load) reloads.
    pub fn invalidate(&self) {
        if self.slot.write().take().is_some() {
            debug!("Catalog cache invalidated for {}", self.source.display());
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().is_some()
    }
}

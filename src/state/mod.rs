//! Shared application state: the catalog generation cell.
//!
//! The catalog is replaced, never mutated. Readers take an `Arc`
//! snapshot and keep traversing their generation even while a rebuild
//! swaps in the next one; the old generation is freed when the last
//! snapshot drops. Rebuild triggers (startup, reload, share mutation,
//! watcher) are serialized by one mutex so two builds never race.

use crate::catalog::{Catalog, CatalogBuilder, Share};
use dircast_common::{Error, Result};
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    base_url: String,
    shares: RwLock<Vec<Share>>,
    /// `None` until the first build completes.
    catalog: RwLock<Option<Arc<Catalog>>>,
    /// Held for the duration of build-and-swap.
    rebuild_lock: Mutex<()>,
}

impl AppState {
    /// `base_url` is the origin embedded in item URLs,
    /// e.g. `http://192.168.1.10:5279`.
    pub fn new(base_url: impl Into<String>, shares: Vec<Share>) -> Arc<Self> {
        Arc::new(Self {
            base_url: base_url.into(),
            shares: RwLock::new(shares),
            catalog: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        })
    }

    /// The current catalog generation, if an initial build has finished.
    ///
    /// The returned `Arc` pins that generation: it stays fully valid for
    /// the caller even if a rebuild swaps the cell meanwhile.
    pub fn snapshot(&self) -> Option<Arc<Catalog>> {
        self.catalog.read().clone()
    }

    /// The configured share list.
    pub fn shares(&self) -> Vec<Share> {
        self.shares.read().clone()
    }

    /// Build a new catalog generation from the current share list and
    /// swap it in. Blocking: run under `spawn_blocking` from async
    /// contexts.
    ///
    /// The swap happens only after the new generation is complete, so a
    /// scan that goes badly (unreadable shares, vanished directories)
    /// still leaves browsers with a consistent catalog.
    pub fn rebuild(&self) -> usize {
        let _guard = self.rebuild_lock.lock();

        let shares = self.shares();
        let catalog = CatalogBuilder::new(self.base_url.clone()).build(&shares);
        let entries = catalog.len();

        *self.catalog.write() = Some(Arc::new(catalog));
        info!("Catalog rebuilt: {} entries", entries);
        entries
    }

    /// Add a share directory and rebuild.
    pub fn add_share(&self, name: Option<String>, path: PathBuf) -> Result<Share> {
        if !path.is_dir() {
            return Err(Error::invalid_argument(format!(
                "share path is not a directory: {path:?}"
            )));
        }

        let share = match name {
            Some(name) => Share { name, path },
            None => Share::from_path(path),
        };
        self.shares.write().push(share.clone());
        self.rebuild();
        Ok(share)
    }

    /// Remove the share at `index` and rebuild.
    pub fn remove_share(&self, index: usize) -> Result<Share> {
        let removed = {
            let mut shares = self.shares.write();
            if index >= shares.len() {
                return Err(Error::invalid_argument(format!(
                    "no share at index {index}"
                )));
            }
            shares.remove(index)
        };
        warn!("Share removed: {:?}", removed.path);
        self.rebuild();
        Ok(removed)
    }
}

//! Catalog watcher: filesystem change notification.
//!
//! Watches every share root recursively and triggers a full catalog
//! rebuild on any create/modify/delete/rename underneath one. There is
//! no incremental patching: the rebuild is the coarsest possible
//! invalidation, traded for never serving a half-updated tree. Bursts of
//! events coalesce into a single rebuild via a settle delay.

use crate::config::WatchConfig;
use crate::state::AppState;
use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Watches share directories and rebuilds the catalog on change.
pub struct CatalogWatcher {
    config: WatchConfig,
    state: Arc<AppState>,
    watcher: Option<RecommendedWatcher>,
}

impl CatalogWatcher {
    pub fn new(config: WatchConfig, state: Arc<AppState>) -> Self {
        Self {
            config,
            state,
            watcher: None,
        }
    }

    /// Start watching the current share roots.
    pub async fn start(&mut self) -> Result<()> {
        if !self.config.enabled {
            tracing::info!("Catalog watcher is disabled");
            return Ok(());
        }

        let shares = self.state.shares();
        if shares.is_empty() {
            tracing::warn!("No share paths to watch");
            return Ok(());
        }

        // The watcher callback runs on notify's thread; it only ever
        // signals "something changed", the tokio task does the rest.
        let (event_tx, mut event_rx) = mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if is_catalog_event(&event.kind) {
                        let _ = event_tx.try_send(());
                    }
                }
            },
            Config::default(),
        )
        .context("Failed to create filesystem watcher")?;

        for share in &shares {
            if share.path.exists() {
                watcher
                    .watch(&share.path, RecursiveMode::Recursive)
                    .with_context(|| format!("Failed to watch path: {:?}", share.path))?;
                tracing::info!("Watching share directory: {:?}", share.path);
            } else {
                tracing::warn!("Watch path does not exist: {:?}", share.path);
            }
        }

        self.watcher = Some(watcher);

        let settle = Duration::from_secs(self.config.settle_time_secs.max(1));
        let state = self.state.clone();
        tokio::spawn(async move {
            while event_rx.recv().await.is_some() {
                // Drain further events until the share has been quiet for
                // the settle window, then rebuild once.
                loop {
                    match tokio::time::timeout(settle, event_rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) | Err(_) => break,
                    }
                }

                tracing::info!("Share content changed, rebuilding catalog");
                let state = state.clone();
                if let Err(e) = tokio::task::spawn_blocking(move || state.rebuild()).await {
                    tracing::error!("Catalog rebuild task failed: {}", e);
                }
            }
        });

        Ok(())
    }

    /// Stop watching.
    pub fn stop(&mut self) {
        self.watcher = None;
        tracing::info!("Catalog watcher stopped");
    }
}

/// Event kinds that invalidate the catalog. Renames arrive as
/// `Modify(Name)` and are covered by the modify arm.
fn is_catalog_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

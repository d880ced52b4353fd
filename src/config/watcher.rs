//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::FileConfiguration;
use crate::observability::metrics;

/// Watches the configuration file and forwards freshly parsed contents.
///
/// Only parsing happens here; validation and resolution are left to the
/// receiver so a bad edit never replaces the published snapshot.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<FileConfiguration>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for parsed configurations.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<FileConfiguration>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = %path.display(), "Configuration file changed");
                    match load_config(&path) {
                        Ok(config) => {
                            if tx.send(config).is_err() {
                                tracing::debug!("Reload receiver gone, dropping update");
                            }
                        }
                        Err(e) => {
                            metrics::record_reload("parse_error");
                            tracing::error!(
                                error = %e,
                                "Failed to read changed configuration, keeping current snapshot"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

//! Process-wide holder for the published runtime configuration.
//!
//! # Design Decisions
//! - Single writer (startup, reload), many readers (request handlers)
//! - `ArcSwap` gives lock-free reads; a reader sees the old snapshot or the
//!   new one in its entirety, never a mix
//! - Superseded snapshots are dropped when the last in-flight `Arc` goes away

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::RuntimeConfiguration;

#[derive(Debug)]
pub struct ConfigHolder {
    current: ArcSwap<RuntimeConfiguration>,
}

impl ConfigHolder {
    /// Create the holder with the startup snapshot.
    pub fn new(initial: RuntimeConfiguration) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<RuntimeConfiguration> {
        self.current.load_full()
    }

    /// Replace the published snapshot, returning the one it replaced.
    pub fn publish(&self, next: RuntimeConfiguration) -> Arc<RuntimeConfiguration> {
        let routes = next.routes().len();
        let previous = self.current.swap(Arc::new(next));
        tracing::info!(
            routes,
            previous_routes = previous.routes().len(),
            "Runtime configuration published"
        );
        previous
    }
}

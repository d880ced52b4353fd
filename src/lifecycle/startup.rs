//! Startup and reload orchestration.
//!
//! # Design Decisions
//! - Fail fast: an invalid configuration at startup is fatal
//! - A failed reload is logged and counted; the published snapshot stays

use std::sync::Arc;

use crate::config::{ConfigBuilder, ConfigError, ConfigHolder, FileConfiguration};
use crate::observability::metrics;
use crate::routing::RuntimeConfiguration;

/// A running gateway configuration: the builder plus the published snapshot.
#[derive(Debug)]
pub struct Gateway {
    builder: ConfigBuilder,
    holder: Arc<ConfigHolder>,
}

impl Gateway {
    /// Build the initial snapshot from the builder's source and publish it.
    pub fn start(builder: ConfigBuilder) -> Result<Self, ConfigError> {
        let initial = builder.create()?;
        tracing::info!(routes = initial.routes().len(), "Gateway configuration loaded");

        Ok(Self {
            builder,
            holder: Arc::new(ConfigHolder::new(initial)),
        })
    }

    /// Shared handle for readers.
    pub fn holder(&self) -> &Arc<ConfigHolder> {
        &self.holder
    }

    /// Rebuild from the builder's source and publish on success.
    pub fn reload(&self) -> Result<(), ConfigError> {
        self.finish_reload(self.builder.create())
    }

    /// Rebuild from an already parsed configuration and publish on success.
    pub fn apply(&self, config: &FileConfiguration) -> Result<(), ConfigError> {
        self.finish_reload(self.builder.create_from(config))
    }

    fn finish_reload(&self, result: Result<RuntimeConfiguration, ConfigError>) -> Result<(), ConfigError> {
        match result {
            Ok(next) => {
                self.holder.publish(next);
                metrics::record_reload("applied");
                Ok(())
            }
            Err(e) => {
                metrics::record_reload("rejected");
                tracing::warn!(
                    routes = self.holder.current().routes().len(),
                    "Reload rejected, keeping current configuration"
                );
                Err(e)
            }
        }
    }
}

//! Configuration sources the builder can be bound to.

use std::path::{Path, PathBuf};

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::FileConfiguration;

/// Supplies the raw configuration for `ConfigBuilder::create`.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<FileConfiguration, ConfigError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Reads a TOML or JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<FileConfiguration, ConfigError> {
        load_config(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    config: FileConfiguration,
}

impl StaticSource {
    pub fn new(config: FileConfiguration) -> Self {
        Self { config }
    }
}

impl ConfigSource for StaticSource {
    fn load(&self) -> Result<FileConfiguration, ConfigError> {
        Ok(self.config.clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

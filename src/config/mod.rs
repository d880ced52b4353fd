//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON) or in-memory FileConfiguration
//!     → loader.rs / source.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every error collected)
//!     → builder.rs (resolve each route in order)
//!     → RuntimeConfiguration (immutable)
//!     → holder.rs (published for readers)
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs detects change
//!     → builder.rs validates and resolves
//!     → atomic swap in holder.rs on success
//!     → previous snapshot stays published on failure
//! ```
//!
//! # Design Decisions
//! - A snapshot is immutable once built; changes require a full rebuild
//! - All raw fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod builder;
pub mod holder;
pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;
pub mod watcher;

pub use builder::ConfigBuilder;
pub use holder::ConfigHolder;
pub use loader::{load_config, ConfigError};
pub use schema::{FileConfiguration, FileGlobalConfiguration, FileRoute};
pub use source::{ConfigSource, FileSource, StaticSource};
pub use validation::{validate_config, ConfigValidator, ValidationError, ValidationReport};

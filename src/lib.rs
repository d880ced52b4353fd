//! Gateway route configuration library.
//!
//! Turns a raw, user-authored gateway configuration into an immutable
//! runtime snapshot of fully resolved routes, and keeps that snapshot
//! published for concurrent readers across reloads.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resolve;
pub mod routing;

pub use config::{ConfigBuilder, ConfigError, ConfigHolder, FileConfiguration};
pub use lifecycle::{Gateway, Shutdown};
pub use routing::{derive_route_key, ResolvedRoute, RouteKey, RuntimeConfiguration};

//! Resolved routing model.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at build time):
//!     FileRoute + global defaults
//!     → resolve/* (option blocks, cascade defaults)
//!     → key.rs (route key)
//!     → template.rs (compiled upstream matcher)
//!     → route.rs (staged builder → ResolvedRoute)
//!     → runtime.rs (ordered, immutable RuntimeConfiguration)
//!
//! Request Dispatch (outside this crate):
//!     path + method → RuntimeConfiguration::find_route → first match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at build time, immutable at runtime
//! - Deterministic: same input always yields the same routes and keys
//! - First match wins (configuration order)

pub mod key;
pub mod options;
pub mod route;
pub mod runtime;
pub mod template;

pub use key::{derive_route_key, RouteKey};
pub use route::{ResolvedRoute, RouteBuilder, RouteEntry};
pub use runtime::{RouteMatch, RuntimeConfiguration};
pub use template::UpstreamPathPattern;

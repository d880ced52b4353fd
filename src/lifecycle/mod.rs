//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Resolve → Publish
//!
//! Reload (startup.rs):
//!     Watcher update or SIGHUP → Validate → Resolve → Publish (or keep previous)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Reload loop exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//!     SIGHUP → Trigger config reload
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::Gateway;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build source → Initial load → Publish → Start reloader → Start listener
//!
//! Reload (reload.rs):
//!     Every interval → Fetch all → Compile → Publish (or keep previous set)
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Broadcast → Server drains, reloader exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup: rules first, listener last
//! - One broadcast channel fans shutdown out to every task

pub mod reload;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use reload::Reloader;
pub use shutdown::Shutdown;
pub use startup::{Service, StartupError};

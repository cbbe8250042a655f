//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (TLS terminated upstream)
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, host and path extraction)
//!     → health check, or routing::Redirector
//!     → response.rs (redirect, 404, health JSON)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};

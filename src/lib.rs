//! Host and path based HTTP redirect service.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                      REDIRECTOR                       │
//!                  │                                                       │
//!  CSV files /     │  ┌──────────┐    ┌──────────┐    ┌──────────────┐    │
//!  S3 objects ─────┼─▶│  source  │───▶│ routing  │───▶│  RuleStore   │    │
//!                  │  │ (fetch)  │    │ (compile)│    │  (ArcSwap)   │    │
//!                  │  └──────────┘    └──────────┘    └──────┬───────┘    │
//!                  │       ▲                                 │            │
//!                  │       │ lifecycle::reload               ▼            │
//!  Client request  │  ┌──────────┐                   ┌──────────────┐    │
//!  ────────────────┼─▶│   http   │──────────────────▶│  Redirector  │    │
//!  ◀───────────────┼──│  server  │◀──────────────────│  / health    │    │
//!                  │  └──────────┘                   └──────────────┘    │
//!                  │                                                       │
//!                  │  config · cli · observability · lifecycle             │
//!                  └──────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod source;

pub use config::schema::RedirectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Redirector, RuleStore};

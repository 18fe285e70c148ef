//! E-commerce API application
//!
//! Wires the auth and catalog crates into one HTTP service: configuration,
//! tracing, health, CORS, rate limiting and the 404 fallback. The binary in
//! `main.rs` supplies Postgres and Redis; tests supply in-memory stores.

pub mod app;
pub mod config;
pub mod health;
pub mod rate_limit;
pub mod telemetry;

pub use app::{AppServices, build_app};
pub use config::AppConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

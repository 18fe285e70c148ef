//! Liveness probe and service descriptor

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use platform::db::Database;
use serde::Serialize;
use serde_json::{Value, json};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct HealthState {
    /// `None` when running without a database (tests)
    pub database: Option<Database>,
    pub environment: String,
    pub started_at: Instant,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since start
    pub uptime: f64,
    pub version: &'static str,
    pub environment: String,
}

/// Always 200; `status` drops to `DEGRADED` when the database probe fails.
pub async fn health(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    let healthy = match &state.database {
        Some(db) => db.health_check().await,
        None => true,
    };

    Json(HealthResponse {
        status: if healthy { "OK" } else { "DEGRADED" },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: VERSION,
        environment: state.environment.clone(),
    })
}

pub async fn service_descriptor() -> Json<Value> {
    Json(json!({
        "name": "E-commerce API",
        "version": VERSION,
        "description": "E-commerce REST API with PostgreSQL, Redis and JWT",
        "health": "/api/v1/health",
        "endpoints": {
            "auth": "/api/v1/auth",
            "products": "/api/v1/products",
        },
    }))
}

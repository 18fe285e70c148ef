//! Router composition
//!
//! Everything under `/api/v1` is rate limited. The descriptor at `/` and the
//! 404 fallback are not.

use std::sync::Arc;
use std::time::Instant;

use auth::AuthAppState;
use auth::auth_router_generic;
use auth::domain::repository::UserRepository;
use axum::extract::OriginalUri;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use catalog::CatalogAppState;
use catalog::catalog_router_generic;
use catalog::domain::repository::ProductRepository;
use kernel::error::app_error::AppError;
use platform::cache::CacheClient;
use platform::db::Database;
use platform::rate_limit::RateLimitConfig;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::health::{self, HealthState};
use crate::rate_limit::{self, RateLimiter};

/// Everything the router needs, already constructed
pub struct AppServices<U, P>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    P: ProductRepository + Clone + Send + Sync + 'static,
{
    pub auth: AuthAppState<U>,
    pub catalog: CatalogAppState<P>,
    /// Backs the rate limiter
    pub cache: CacheClient,
    pub database: Option<Database>,
    pub rate_limit: RateLimitConfig,
    pub environment: String,
    pub cors_origins: Vec<String>,
}

pub fn build_app<U, P>(services: AppServices<U, P>) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    P: ProductRepository + Clone + Send + Sync + 'static,
{
    let health_state = Arc::new(HealthState {
        database: services.database,
        environment: services.environment,
        started_at: Instant::now(),
    });
    let limiter = Arc::new(RateLimiter::new(services.cache, services.rate_limit));

    let api = Router::new()
        .route("/health", get(health::health).with_state(health_state))
        .nest("/auth", auth_router_generic(services.auth))
        .nest("/products", catalog_router_generic(services.catalog))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce));

    Router::new()
        .route("/", get(health::service_descriptor))
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&services.cors_origins))
}

async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Route {method} {} not found", uri.path()))
}

/// `*` allows any origin without credentials; otherwise the listed origins
/// with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

//! Catalog Router

use std::sync::Arc;

use auth::TokenService;
use auth::middleware::{ADMIN_ONLY, require_auth, require_roles};
use axum::{
    Router, middleware,
    routing::{MethodRouter, get, post, put},
};

use crate::domain::repository::ProductRepository;
use crate::infra::postgres::PgProductRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the Catalog router with PostgreSQL repository
pub fn catalog_router(state: CatalogAppState<PgProductRepository>) -> Router {
    catalog_router_generic(state)
}

/// Bearer token plus `ADMIN` role; authentication runs first.
fn admin_only<S>(route: MethodRouter<S>, tokens: Arc<TokenService>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth))
}

/// Create a generic Catalog router for any repository implementation
///
/// Reads are public; writes and stats are administrator-only.
pub fn catalog_router_generic<R>(state: CatalogAppState<R>) -> Router
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let tokens = state.tokens.clone();

    Router::new()
        .route(
            "/",
            get(handlers::list_products::<R>)
                .merge(admin_only(post(handlers::create_product::<R>), tokens.clone())),
        )
        .route(
            "/stats/overview",
            admin_only(get(handlers::product_stats::<R>), tokens.clone()),
        )
        .route(
            "/{id}",
            get(handlers::get_product::<R>).merge(admin_only(
                put(handlers::update_product::<R>).delete(handlers::delete_product::<R>),
                tokens,
            )),
        )
        .with_state(state)
}

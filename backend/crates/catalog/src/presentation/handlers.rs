//! HTTP Handlers

use std::sync::Arc;

use auth::TokenService;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::{ValidatedJson, ValidatedQuery};
use platform::cache::CacheClient;

use crate::application::config::CatalogConfig;
use crate::application::view::ProductPage;
use crate::application::{
    CreateProductUseCase, DeleteProductUseCase, GetProductUseCase, ListProductsUseCase,
    ProductStatsUseCase, UpdateProductUseCase,
};
use crate::domain::repository::ProductRepository;
use crate::error::CatalogResult;
use crate::presentation::dto::{
    CreateProductRequest, ListProductsQuery, MessageResponse, ProductIdPath,
    ProductMessageResponse, ProductResponse, StatsResponse, UpdateProductRequest,
};

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub cache: CacheClient,
    /// Verifies bearer tokens on admin routes
    pub tokens: Arc<TokenService>,
    pub config: Arc<CatalogConfig>,
}

impl<R> CatalogAppState<R>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    pub fn new(
        repo: R,
        cache: CacheClient,
        tokens: Arc<TokenService>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            repo: Arc::new(repo),
            cache,
            tokens,
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Public
// ============================================================================

/// GET /products
pub async fn list_products<R>(
    State(state): State<CatalogAppState<R>>,
    ValidatedQuery(query): ValidatedQuery<ListProductsQuery>,
) -> CatalogResult<Json<ProductPage>>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        ListProductsUseCase::new(state.repo.clone(), state.cache.clone(), state.config.clone());
    Ok(Json(use_case.execute(query).await?))
}

/// GET /products/{id}
pub async fn get_product<R>(
    State(state): State<CatalogAppState<R>>,
    ProductIdPath(id): ProductIdPath,
) -> CatalogResult<Json<ProductResponse>>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        GetProductUseCase::new(state.repo.clone(), state.cache.clone(), state.config.clone());
    let product = use_case.execute(id).await?;

    Ok(Json(ProductResponse { product }))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /products
pub async fn create_product<R>(
    State(state): State<CatalogAppState<R>>,
    ValidatedJson(input): ValidatedJson<CreateProductRequest>,
) -> CatalogResult<(StatusCode, Json<ProductMessageResponse>)>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        CreateProductUseCase::new(state.repo.clone(), state.cache.clone(), state.config.clone());
    let product = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMessageResponse {
            message: "Product created successfully",
            product,
        }),
    ))
}

/// PUT /products/{id}
pub async fn update_product<R>(
    State(state): State<CatalogAppState<R>>,
    ProductIdPath(id): ProductIdPath,
    ValidatedJson(changes): ValidatedJson<UpdateProductRequest>,
) -> CatalogResult<Json<ProductMessageResponse>>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProductUseCase::new(state.repo.clone(), state.cache.clone());
    let product = use_case.execute(id, changes).await?;

    Ok(Json(ProductMessageResponse {
        message: "Product updated successfully",
        product,
    }))
}

/// DELETE /products/{id}
pub async fn delete_product<R>(
    State(state): State<CatalogAppState<R>>,
    ProductIdPath(id): ProductIdPath,
) -> CatalogResult<Json<MessageResponse>>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    DeleteProductUseCase::new(state.repo.clone(), state.cache.clone())
        .execute(id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}

/// GET /products/stats/overview
pub async fn product_stats<R>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<StatsResponse>>
where
    R: ProductRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        ProductStatsUseCase::new(state.repo.clone(), state.cache.clone(), state.config.clone());
    let stats = use_case.execute().await?;

    Ok(Json(StatsResponse { stats }))
}

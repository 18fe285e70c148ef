//! Per-client request throttling
//!
//! Fixed window per client IP, counted in the cache store. A store failure
//! lets the request through.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use platform::cache::CacheClient;
use platform::client::client_key;
use platform::rate_limit::{RateLimitConfig, RateLimitStore};

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: CacheClient,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: CacheClient, config: RateLimitConfig) -> Self {
        Self { store, config }
    }
}

pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let direct_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_key(request.headers(), direct_ip);

    let remaining = match limiter
        .store
        .check_and_increment(&client, &limiter.config)
        .await
    {
        Ok(result) if !result.allowed => {
            tracing::warn!(client = %client, "Rate limit exceeded");
            return rejection(&limiter.config, result.retry_after);
        }
        Ok(result) => Some(result.remaining),
        Err(e) => {
            tracing::warn!(error = %e, "Rate limiter unavailable, request allowed");
            None
        }
    };

    let mut response = next.run(request).await;
    if let Some(remaining) = remaining {
        let headers = response.headers_mut();
        headers.insert(
            RATELIMIT_LIMIT,
            HeaderValue::from(limiter.config.max_requests),
        );
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
    }
    response
}

fn rejection(config: &RateLimitConfig, retry_after: Duration) -> Response {
    let message = format!(
        "Too many requests. Limit: {} requests per {}",
        config.max_requests,
        humantime::format_duration(config.window)
    );
    let mut response = AppError::too_many_requests(message).into_response();
    response.headers_mut().insert(
        header::RETRY_AFTER,
        HeaderValue::from(retry_after.as_secs().max(1)),
    );
    response
}

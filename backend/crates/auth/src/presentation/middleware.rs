//! Auth Middleware
//!
//! Authentication gate (bearer token → [`AuthenticatedUser`] in request
//! extensions) and authorization gate (role allow-list).

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::AuthError;
use crate::infra::jwt::TokenService;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::AuthenticationRequired)
    }
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme == "Bearer" && !token.is_empty()).then_some(token)
}

/// Middleware that requires a valid bearer token
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
    let claims = tokens.verify(token)?;

    req.extensions_mut().insert(AuthenticatedUser {
        id: claims.id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Role check. An empty allow-list admits any authenticated identity.
pub fn authorize(
    identity: Option<&AuthenticatedUser>,
    allowed: &[UserRole],
) -> Result<(), AuthError> {
    let identity = identity.ok_or(AuthError::AuthenticationRequired)?;

    if !allowed.is_empty() && !allowed.contains(&identity.role) {
        tracing::warn!(
            user_id = %identity.id,
            role = %identity.role,
            "Role not permitted for route"
        );
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(())
}

/// Middleware form of [`authorize`]; layer it inside [`require_auth`]
pub async fn require_roles(
    State(allowed): State<&'static [UserRole]>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authorize(req.extensions().get::<AuthenticatedUser>(), allowed)?;
    Ok(next.run(req).await)
}

/// Allow-list for administrator-only routes
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::ValidatedJson;
use platform::cache::CacheClient;
use platform::password::CredentialHasher;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordUseCase, GetProfileUseCase, LoginUseCase, LogoutUseCase, RegisterUseCase,
    UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::infra::jwt::TokenService;
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, MessageResponse, ProfileResponse,
    ProfileUpdatedResponse, RegisterRequest, SessionResponse, UpdateProfileRequest,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub cache: CacheClient,
    pub hasher: CredentialHasher,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Build the state, deriving the hasher and token service from `config`
    pub fn new(repo: R, cache: CacheClient, config: AuthConfig) -> AuthResult<Self> {
        let hasher = CredentialHasher::new(config.hash_cost)?;
        let tokens = TokenService::from_config(&config);

        Ok(Self {
            repo: Arc::new(repo),
            cache,
            hasher,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<SessionResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.cache.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let session = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "Registration successful",
            user: session.user.into(),
            token: session.token,
        }),
    ))
}

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.cache.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let session = use_case.execute(input).await?;

    Ok(Json(SessionResponse {
        message: "Login successful",
        user: session.user.into(),
        token: session.token,
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /auth/profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: AuthenticatedUser,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        GetProfileUseCase::new(state.repo.clone(), state.cache.clone(), state.config.clone());
    let user = use_case.execute(identity.id).await?;

    Ok(Json(ProfileResponse { user }))
}

/// PUT /auth/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AuthResult<Json<ProfileUpdatedResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        UpdateProfileUseCase::new(state.repo.clone(), state.cache.clone(), state.config.clone());
    let user = use_case.execute(identity.id, input).await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully",
        user,
    }))
}

// ============================================================================
// Password / Logout
// ============================================================================

/// PUT /auth/change-password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    identity: AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.hasher.clone());
    use_case.execute(identity.id, input).await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully",
    }))
}

/// POST /auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    identity: AuthenticatedUser,
) -> Json<MessageResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    LogoutUseCase::new(state.cache.clone())
        .execute(identity.id)
        .await;

    Json(MessageResponse {
        message: "Logout successful",
    })
}

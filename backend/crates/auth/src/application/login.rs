//! Login Use Case
//!
//! Unknown email and wrong password fail identically, and both pay for
//! one Argon2 verification.

use std::sync::Arc;

use platform::cache::CacheClient;
use platform::password::CredentialHasher;

use crate::application::config::AuthConfig;
use crate::application::view::{AuthenticatedSession, UserView, user_cache_key};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};
use crate::infra::jwt::{TokenIdentity, TokenService};

/// Login input
#[derive(Debug)]
pub struct LoginInput {
    pub email: Email,
    pub password: RawPassword,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(
        repo: Arc<R>,
        cache: CacheClient,
        hasher: CredentialHasher,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            cache,
            hasher,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthenticatedSession> {
        tracing::info!(email = %input.email, "Login attempt");

        let Some(user) = self.repo.find_by_email(&input.email).await? else {
            self.hasher
                .verify_decoy_blocking(input.password.into_clear_text())
                .await?;
            tracing::warn!(email = %input.email, "Login with unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify_blocking(input.password.into_clear_text(), user.password_hash.clone())
            .await?;
        if !valid {
            tracing::warn!(user_id = %user.user_id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&TokenIdentity {
            id: user.user_id,
            email: user.email.as_str().to_string(),
            role: user.role,
        })?;

        let view = UserView::from(&user);
        self.cache
            .try_set(
                &user_cache_key(&user.user_id),
                &view,
                Some(self.config.user_cache_ttl),
            )
            .await;

        tracing::info!(user_id = %user.user_id, "Login succeeded");

        Ok(AuthenticatedSession { user: view, token })
    }
}

//! Register Use Case
//!
//! Creates a new user account and issues its first token.

use std::sync::Arc;

use platform::cache::CacheClient;
use platform::password::CredentialHasher;

use crate::application::config::AuthConfig;
use crate::application::view::{AuthenticatedSession, UserView, user_cache_key};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::RawPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};
use crate::infra::jwt::{TokenIdentity, TokenService};

/// Register input (already validated)
#[derive(Debug)]
pub struct RegisterInput {
    pub email: Email,
    pub name: UserName,
    pub password: RawPassword,
    pub role: UserRole,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthenticatedSession> {
        tracing::info!(email = %input.email, "Registration attempt");

        if input.role.is_admin() && !self.config.allow_admin_self_registration {
            return Err(AuthError::AdminRegistrationDisabled);
        }

        if self.repo.find_by_email(&input.email).await?.is_some() {
            tracing::warn!(email = %input.email, "Registration with existing email");
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self
            .hasher
            .hash_blocking(input.password.into_clear_text())
            .await?;

        let user = User::new(input.email, input.name, input.role, password_hash);

        // A concurrent registration can still win the race; the store reports it.
        self.repo.create(&user).await?;

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

        tracing::info!(user_id = %user.user_id, role = %user.role, "User registered");

        Ok(AuthenticatedSession { user: view, token })
    }
}

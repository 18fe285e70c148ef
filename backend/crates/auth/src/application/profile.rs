//! Profile Use Cases
//!
//! Cache-aside read of the caller's profile, and partial profile updates.

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::config::AuthConfig;
use crate::application::view::{UserView, user_cache_key};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Get Profile
// ============================================================================

/// Get profile use case
pub struct GetProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    config: Arc<AuthConfig>,
}

impl<R> GetProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, cache: CacheClient, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<UserView> {
        let key = user_cache_key(&user_id);

        if let Some(view) = self.cache.try_get::<UserView>(&key).await {
            tracing::debug!(user_id = %user_id, "Profile served from cache");
            return Ok(view);
        }

        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let view = UserView::from(&user);
        self.cache
            .try_set(&key, &view, Some(self.config.user_cache_ttl))
            .await;

        tracing::debug!(user_id = %user_id, "Profile loaded");
        Ok(view)
    }
}

// ============================================================================
// Update Profile
// ============================================================================

/// Update profile input; at least one field is set
#[derive(Debug, Clone)]
pub struct UpdateProfileInput {
    pub name: Option<UserName>,
    pub email: Option<Email>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    config: Arc<AuthConfig>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, cache: CacheClient, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub async fn execute(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<UserView> {
        let mut user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(email) = &input.email
            && email != &user.email
            && self
                .repo
                .find_by_email_excluding(email, &user_id)
                .await?
                .is_some()
        {
            tracing::warn!(user_id = %user_id, "Profile update to an email in use");
            return Err(AuthError::EmailInUse);
        }

        user.update_profile(input.name, input.email);
        self.repo.update(&user).await?;

        let view = UserView::from(&user);
        self.cache
            .try_set(
                &user_cache_key(&user_id),
                &view,
                Some(self.config.user_cache_ttl),
            )
            .await;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(view)
    }
}

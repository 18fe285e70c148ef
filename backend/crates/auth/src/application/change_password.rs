//! Change Password Use Case
//!
//! Tokens issued before the change stay valid until they expire.

use std::sync::Arc;

use platform::password::CredentialHasher;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Change password input
#[derive(Debug)]
pub struct ChangePasswordInput {
    pub current_password: RawPassword,
    pub new_password: RawPassword,
}

/// Change password use case
pub struct ChangePasswordUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    hasher: CredentialHasher,
}

impl<R> ChangePasswordUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, hasher: CredentialHasher) -> Self {
        Self { repo, hasher }
    }

    pub async fn execute(&self, user_id: UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let mut user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let valid = self
            .hasher
            .verify_blocking(
                input.current_password.into_clear_text(),
                user.password_hash.clone(),
            )
            .await?;
        if !valid {
            tracing::warn!(user_id = %user_id, "Password change with wrong current password");
            return Err(AuthError::IncorrectCurrentPassword);
        }

        let password_hash = self
            .hasher
            .hash_blocking(input.new_password.into_clear_text())
            .await?;
        user.set_password(password_hash);
        self.repo.update(&user).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}

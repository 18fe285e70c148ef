//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait
///
/// Users are never deleted through this interface.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user. Duplicate emails surface as `AuthError::EmailTaken`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find a user with `email` other than `excluded`
    async fn find_by_email_excluding(
        &self,
        email: &Email,
        excluded: &UserId,
    ) -> AuthResult<Option<User>>;

    /// Persist profile fields, password hash and `updated_at`
    async fn update(&self, user: &User) -> AuthResult<()>;
}

//! User Entity
//!
//! Identity record. The password hash lives here but never leaves the
//! application layer: responses are built from [`UserView`](crate::application::view::UserView).

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, normalized
    pub email: Email,
    /// Display name
    pub name: UserName,
    pub role: UserRole,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: Email, name: UserName, role: UserRole, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            name,
            role,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial profile update
    pub fn update_profile(&mut self, name: Option<UserName>, email: Option<Email>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }

    /// Replace the stored password hash
    pub fn set_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

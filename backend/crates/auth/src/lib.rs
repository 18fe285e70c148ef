//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations, JWT signing
//! - `presentation/` - HTTP handlers, DTOs, router, gates
//!
//! ## Features
//! - Registration and login with email + password
//! - Profile read (cache-aside) and update, password change, logout
//! - Stateless HS256 bearer tokens (`iss`/`aud` checked, 7 day default lifetime)
//! - Role-based access (`USER`, `ADMIN`) through [`middleware::require_roles`]
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, never returned or cached
//! - Unknown email and wrong password are indistinguishable to the caller
//! - Logout only drops the cached profile; a token stays valid until `exp`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository, TokenService};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

//! Infrastructure Layer
//!
//! Database implementations and token signing.

pub mod jwt;
pub mod memory;
pub mod postgres;

pub use jwt::{Claims, TokenIdentity, TokenService};
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

//! User identifier, carried in token claims and `user:<id>` cache keys

pub use kernel::id::UserId;

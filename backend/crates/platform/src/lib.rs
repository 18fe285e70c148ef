//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id)
//! - Cache-aside accessor (Redis / in-process)
//! - Postgres handle with health probe and transaction wrapper
//! - Rate limiting infrastructure
//! - Client identification and hashing helpers

pub mod cache;
pub mod client;
pub mod crypto;
pub mod db;
pub mod password;
pub mod rate_limit;

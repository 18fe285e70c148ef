//! Password Hashing and Verification
//!
//! Credential service built on Argon2id:
//! - Configurable iteration count (`t_cost`), memory-hard hashing
//! - Zeroization of clear text passwords
//! - Constant-time comparison (inside `argon2`)
//!
//! Password *policy* (length, character classes) is a request validation
//! concern and lives with the auth request validators.

use std::fmt;
use std::sync::Arc;

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::rngs::OsRng;
use thiserror::Error;
use tokio::sync::OnceCell;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Default Argon2id iteration count
pub const DEFAULT_HASH_COST: u32 = 2;

/// Memory cost in KiB (OWASP: 19 MiB)
const MEMORY_COST_KIB: u32 = 19_456;

/// Degree of parallelism
const PARALLELISM: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid cost parameters
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

impl From<PasswordHashError> for kernel::error::app_error::AppError {
    fn from(err: PasswordHashError) -> Self {
        Self::internal("Password processing failed").with_source(err)
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// Unicode is normalized using NFKC so visually identical input hashes the same.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        let mut raw = raw.into();
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters and salt, so a
/// digest produced with one cost verifies fine after the cost is changed.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    pub fn into_phc_string(self) -> String {
        self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Stateless credential service
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, CredentialHasher};
///
/// let hasher = CredentialHasher::new(1).unwrap();
/// let password = ClearTextPassword::new("Secr3t!pass");
/// let hashed = hasher.hash(&password).unwrap();
/// assert!(hasher.verify(&password, &hashed).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
    decoy: Arc<OnceCell<HashedPassword>>,
}

/// Plaintext behind the decoy digest; never matches a stored account.
const DECOY_PASSWORD: &str = "decoy-credential-never-issued";

impl CredentialHasher {
    /// Build a hasher with the given Argon2id iteration count.
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        let params = Params::new(MEMORY_COST_KIB, cost, PARALLELISM, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;
        Ok(Self {
            params,
            decoy: Arc::default(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash with a fresh 128-bit random salt.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// `Ok(false)` on mismatch; errors only when the digest itself is unusable.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        hashed: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(&hashed.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::HashingFailed(e.to_string())),
        }
    }

    /// [`Self::hash`] on the blocking pool; Argon2 is CPU-bound.
    pub async fn hash_blocking(
        &self,
        password: ClearTextPassword,
    ) -> Result<HashedPassword, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
    }

    /// [`Self::verify`] on the blocking pool.
    pub async fn verify_blocking(
        &self,
        password: ClearTextPassword,
        hashed: HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
    }
}

impl CredentialHasher {
    /// Full verification against a decoy digest built with these parameters,
    /// for login paths that have no stored hash. The outcome is discarded.
    pub async fn verify_decoy_blocking(
        &self,
        password: ClearTextPassword,
    ) -> Result<(), PasswordHashError> {
        let decoy = self
            .decoy
            .get_or_try_init(|| self.hash_blocking(ClearTextPassword::new(DECOY_PASSWORD)))
            .await?
            .clone();
        self.verify_blocking(password, decoy).await.map(|_| ())
    }

    /// Whether the decoy digest has been built yet.
    pub fn decoy_ready(&self) -> bool {
        self.decoy.initialized()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
            decoy: Arc::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let password = ClearTextPassword::new("TestPassword123!");
        let hashed = hasher.hash(&password).unwrap();

        assert!(hasher.verify(&password, &hashed).unwrap());

        let wrong_password = ClearTextPassword::new("WrongPassword123!");
        assert!(!hasher.verify(&wrong_password, &hashed).unwrap());
    }

    #[test]
    fn test_same_password_different_salt() {
        let hasher = hasher();
        let password = ClearTextPassword::new("TestPassword123!");
        let a = hasher.hash(&password).unwrap();
        let b = hasher.hash(&password).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_cost_change_keeps_old_hashes_valid() {
        let password = ClearTextPassword::new("TestPassword123!");
        let hashed = CredentialHasher::new(1).unwrap().hash(&password).unwrap();
        assert!(CredentialHasher::new(3)
            .unwrap()
            .verify(&password, &hashed)
            .unwrap());
    }

    #[test]
    fn test_zero_cost_rejected() {
        assert!(matches!(
            CredentialHasher::new(0),
            Err(PasswordHashError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_nfkc_normalization() {
        let hasher = hasher();
        // U+FF21 FULLWIDTH LATIN CAPITAL LETTER A normalizes to "A"
        let hashed = hasher.hash(&ClearTextPassword::new("\u{FF21}bc12345!")).unwrap();
        assert!(hasher.verify(&ClearTextPassword::new("Abc12345!"), &hashed).unwrap());
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = hasher();
        let password = ClearTextPassword::new("TestPassword123!");
        let hashed = hasher.hash(&password).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&password, &restored).unwrap());
    }

    #[test]
    fn test_invalid_phc_string() {
        let result = HashedPassword::from_phc_string("not_a_valid_hash");
        assert!(matches!(result, Err(PasswordHashError::InvalidHashFormat)));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = hasher();
        let hashed = hasher
            .hash_blocking(ClearTextPassword::new("TestPassword123!"))
            .await
            .unwrap();
        assert!(hasher
            .verify_blocking(ClearTextPassword::new("TestPassword123!"), hashed)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_decoy_digest_is_built_once_and_shared() {
        let hasher = hasher();
        assert!(!hasher.decoy_ready());
        hasher
            .verify_decoy_blocking(ClearTextPassword::new("anything"))
            .await
            .unwrap();
        assert!(hasher.decoy_ready());
        let first = hasher.decoy.get().cloned().unwrap();

        let clone = hasher.clone();
        clone
            .verify_decoy_blocking(ClearTextPassword::new(DECOY_PASSWORD))
            .await
            .unwrap();
        assert_eq!(clone.decoy.get(), Some(&first));
        assert!(hasher
            .verify(&ClearTextPassword::new(DECOY_PASSWORD), &first)
            .unwrap());
    }
}

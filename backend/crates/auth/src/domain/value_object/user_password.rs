//! User Password Value Object
//!
//! Policy for passwords chosen by the user (registration, password change).
//! Hashing and verification are delegated to `platform::password`.
//!
//! ## Policy
//! - At least 8 characters
//! - At least one lowercase letter, one uppercase letter, one digit
//! - At least one of `!@#$%^&*`

use platform::password::ClearTextPassword;
use std::fmt;
use thiserror::Error;

/// Minimum password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Special characters, one of which is required
pub const SPECIAL_CHARS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("is required")]
    Empty,

    #[error("must be at least {MIN_PASSWORD_LENGTH} characters long")]
    TooShort,

    #[error(
        "must contain at least one lowercase letter, one uppercase letter, one digit and one special character (!@#$%^&*)"
    )]
    MissingCharacterClass,
}

impl PasswordPolicyError {
    /// Full message with the field label in front, e.g. "New password is required"
    pub fn message(&self, label: &str) -> String {
        format!("{label} {self}")
    }
}

/// Password from user input
///
/// Memory is zeroized on drop via `ClearTextPassword`.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Accept a newly chosen password, enforcing the policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        check_policy(&raw)?;
        Ok(Self(ClearTextPassword::new(raw)))
    }

    /// Accept a password for comparison only (login, current password)
    pub fn unchecked(raw: String) -> Self {
        Self(ClearTextPassword::new(raw))
    }

    pub fn into_clear_text(self) -> ClearTextPassword {
        self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

pub fn check_policy(raw: &str) -> Result<(), PasswordPolicyError> {
    if raw.is_empty() {
        return Err(PasswordPolicyError::Empty);
    }
    if raw.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }

    let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = raw.chars().any(|c| c.is_ascii_digit());
    let has_special = raw.chars().any(|c| SPECIAL_CHARS.contains(&c));

    if !(has_lower && has_upper && has_digit && has_special) {
        return Err(PasswordPolicyError::MissingCharacterClass);
    }
    Ok(())
}

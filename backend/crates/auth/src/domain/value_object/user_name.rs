//! User Name Value Object
//!
//! ユーザーの表示名。ログインには使用せず、プロフィール表示のみに使う。
//!
//! ## 設計方針
//! - 前後の空白は除去してから検証する
//! - 英字、Latin-1 のアクセント付き文字（À〜ÿ）、空白、ハイフンのみ許可
//!
//! ## 不変条件
//! - 長さ: 2〜100文字（除去後、Unicode スカラー値で数える）

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 2;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 100;

// ============================================================================
// Error
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Name is required")]
    Empty,

    #[error("Name must be at least {USER_NAME_MIN_LENGTH} characters long")]
    TooShort,

    #[error("Name cannot exceed {USER_NAME_MAX_LENGTH} characters")]
    TooLong,

    #[error("Name can only contain letters, spaces and hyphens")]
    InvalidCharacter,
}

// ============================================================================
// Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(UserNameError::Empty);
        }

        let len = name.chars().count();
        if len < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort);
        }
        if len > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong);
        }

        if !name.chars().all(is_allowed_char) {
            return Err(UserNameError::InvalidCharacter);
        }

        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c) || c.is_whitespace() || c == '-'
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

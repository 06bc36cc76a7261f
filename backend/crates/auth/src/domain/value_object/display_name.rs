//! Display Name Value Object
//!
//! 表示名は画面上でユーザーを呼ぶための名前。ログインには使わない。
//!
//! ## 不変条件
//! - 前後の空白は除去（NFC正規化後）
//! - 長さ: 2〜50文字
//! - 使用可能: 文字（全言語）、空白、`-` `'` `.`
//! - 文字を最低1文字含む（記号のみ禁止）
//! - 連続する空白は禁止

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for display names (in characters)
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;

/// Maximum length for display names (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;

const ALLOWED_PUNCTUATION: &[char] = &[' ', '-', '\'', '.'];

/// Display name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().trim().nfc().collect();

        if normalized.is_empty() {
            return Err(AppError::bad_request("Name is required"));
        }

        let len = normalized.chars().count();
        if len < DISPLAY_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {} characters",
                DISPLAY_NAME_MIN_LENGTH
            )));
        }
        if len > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                DISPLAY_NAME_MAX_LENGTH
            )));
        }

        if !normalized
            .chars()
            .all(|c| c.is_alphabetic() || ALLOWED_PUNCTUATION.contains(&c))
        {
            return Err(AppError::bad_request(
                "Name can only contain letters, spaces, hyphens, apostrophes and periods",
            ));
        }

        if !normalized.chars().any(char::is_alphabetic) {
            return Err(AppError::bad_request("Name must contain at least one letter"));
        }

        if normalized.contains("  ") {
            return Err(AppError::bad_request("Name cannot contain consecutive spaces"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        DisplayName::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for ok in ["Jo", "Mary-Jane O'Neil", "Dr. Who", "山田 太郎", "Zoë"] {
            assert!(DisplayName::new(ok).is_ok(), "{ok:?} should be accepted");
        }
    }

    #[test]
    fn test_trimmed() {
        let name = DisplayName::new("  Ada Lovelace ").unwrap();
        assert_eq!(name.as_str(), "Ada Lovelace");
    }

    #[test]
    fn test_length_bounds() {
        assert!(DisplayName::new("A").is_err());
        assert!(DisplayName::new("a".repeat(50)).is_ok());
        assert!(DisplayName::new("a".repeat(51)).is_err());
    }

    #[test]
    fn test_rejected_characters() {
        for bad in ["Bob123", "<script>", "a_b", "Ann\tLee"] {
            assert!(DisplayName::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_requires_letter() {
        let err = DisplayName::new("-- ..").unwrap_err();
        assert_eq!(err.message(), "Name must contain at least one letter");
    }

    #[test]
    fn test_consecutive_spaces() {
        assert!(DisplayName::new("Ada  Lovelace").is_err());
    }

    #[test]
    fn test_empty() {
        let err = DisplayName::new("   ").unwrap_err();
        assert_eq!(err.message(), "Name is required");
    }
}

//! Password Policy and Strength Scoring
//!
//! Client-side checks run before a registration request is sent:
//! - Policy validation (length, character classes, predictable patterns)
//! - Strength scoring for the password meter
//! - Zeroization of the clear text once it is no longer needed
//!
//! The backend enforces its own rules; these checks only save a round trip.

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Length at which the meter awards a second length point
const STRONG_LENGTH: usize = 12;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Password is required")]
    EmptyOrWhitespace,

    #[error("Password contains invalid characters")]
    InvalidCharacter,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one number")]
    MissingDigit,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password that satisfies the registration policy
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();
        let mut raw = raw;
        raw.zeroize();

        if let Err(e) = check_policy(&normalized) {
            let mut normalized = normalized;
            normalized.zeroize();
            return Err(e);
        }

        Ok(Self(normalized))
    }

    /// Wrap a password without applying the registration policy
    ///
    /// Used for sign-in, where the account's password may predate the
    /// current policy; only emptiness is rejected. Normalized with NFKC
    /// like [`ClearTextPassword::new`], so it matches what was registered.
    pub fn for_sign_in(raw: String) -> Result<Self, PasswordPolicyError> {
        let mut normalized: String = raw.nfkc().collect();
        let mut raw = raw;
        raw.zeroize();

        if normalized.trim().is_empty() {
            normalized.zeroize();
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        Ok(Self(normalized))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Strength score of this password
    pub fn strength(&self) -> PasswordStrength {
        password_strength(&self.0)
    }
}

impl PartialEq for ClearTextPassword {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    // Count Unicode code points (not bytes)
    let char_count = password.chars().count();
    if char_count < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: char_count,
        });
    }
    if char_count > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: char_count,
        });
    }

    // Control characters (except space, tab, newline)
    if password
        .chars()
        .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
    {
        return Err(PasswordPolicyError::InvalidCharacter);
    }

    if !password.chars().any(char::is_lowercase) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }

    if is_common_pattern(password) {
        return Err(PasswordPolicyError::CommonPattern);
    }

    Ok(())
}

// ============================================================================
// Strength meter
// ============================================================================

/// Strength level shown next to the password field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StrengthLevel::VeryWeak => "very weak",
            StrengthLevel::Weak => "weak",
            StrengthLevel::Fair => "fair",
            StrengthLevel::Good => "good",
            StrengthLevel::Strong => "strong",
        }
    }

    const fn from_score(score: u8) -> Self {
        match score {
            0 => StrengthLevel::VeryWeak,
            1 => StrengthLevel::Weak,
            2 => StrengthLevel::Fair,
            3 => StrengthLevel::Good,
            _ => StrengthLevel::Strong,
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`password_strength`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0..=4
    pub score: u8,
    pub level: StrengthLevel,
    pub suggestions: Vec<&'static str>,
}

/// Score a password for the strength meter
///
/// One point each for: length ≥ 8, length ≥ 12, mixed case, a digit, a
/// symbol; capped at 4. Predictable passwords score 0 regardless.
pub fn password_strength(password: &str) -> PasswordStrength {
    let mut points: u8 = 0;
    let mut suggestions = Vec::new();
    let len = password.chars().count();

    if len >= MIN_PASSWORD_LENGTH {
        points += 1;
    } else {
        suggestions.push("Use at least 8 characters");
    }
    if len >= STRONG_LENGTH {
        points += 1;
    } else if len >= MIN_PASSWORD_LENGTH {
        suggestions.push("Use 12 or more characters for a stronger password");
    }

    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    if has_lower && has_upper {
        points += 1;
    } else {
        suggestions.push("Mix uppercase and lowercase letters");
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        points += 1;
    } else {
        suggestions.push("Add a number");
    }

    if password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        points += 1;
    } else {
        suggestions.push("Add a symbol such as ! or #");
    }

    let score = if password.is_empty() || is_common_pattern(password) {
        if !password.is_empty() {
            suggestions.insert(0, "Avoid common passwords and predictable patterns");
        }
        0
    } else {
        points.min(4)
    };

    PasswordStrength {
        score,
        level: StrengthLevel::from_score(score),
        suggestions,
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check for common weak patterns
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // All same character (e.g., "aaaaaaaa")
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if lower.chars().count() >= 3 && chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &[
        "qwerty",
        "qwertyuiop",
        "asdfgh",
        "asdfghjkl",
        "zxcvbn",
        "qazwsx",
        "1qaz2wsx",
    ];
    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "12345678",
        "123456789",
        "1234567890",
        "abcdefgh",
        "abc12345",
        "letmein",
        "letmein1",
        "welcome",
        "welcome1",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "monkey",
        "shadow",
        "master",
        "dragon",
        "baseball",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// All digits, ascending or descending (e.g., "12345678", "9876")
fn is_sequential_numbers(s: &str) -> bool {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 {
        return false;
    }

    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));
    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

// ============================================================================
// Tests
// ============================================================================

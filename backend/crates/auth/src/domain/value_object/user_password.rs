//! User Password Value Object
//!
//! Domain wrapper over `platform::password::ClearTextPassword` that turns
//! policy violations into user-facing `AppError`s.
//! Memory is zeroized when the wrapper is dropped.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, PasswordPolicyError, PasswordStrength};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Password entered by the user
pub struct UserPassword(ClearTextPassword);

impl UserPassword {
    /// Password for a new account; the full registration policy applies
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(policy_error)
    }

    /// Password typed into the sign-in form; only emptiness is rejected
    pub fn for_sign_in(raw: String) -> AppResult<Self> {
        ClearTextPassword::for_sign_in(raw)
            .map(Self)
            .map_err(policy_error)
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub fn strength(&self) -> PasswordStrength {
        self.0.strength()
    }

    /// Compare against the confirmation field, normalized the same way
    pub fn matches_confirmation(&self, confirmation: &str) -> bool {
        confirmation.nfkc().eq(self.0.expose().chars())
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[REDACTED]").finish()
    }
}

fn policy_error(e: PasswordPolicyError) -> AppError {
    let action = match &e {
        PasswordPolicyError::TooShort { .. } => "Please choose a longer password",
        PasswordPolicyError::TooLong { .. } => "Please choose a shorter password",
        PasswordPolicyError::EmptyOrWhitespace => "Please enter a password",
        PasswordPolicyError::InvalidCharacter => "Remove control characters from the password",
        PasswordPolicyError::MissingLowercase
        | PasswordPolicyError::MissingUppercase
        | PasswordPolicyError::MissingDigit => {
            "Use upper and lower case letters and at least one number"
        }
        PasswordPolicyError::CommonPattern => "Please choose a less predictable password",
    };
    AppError::bad_request(e.to_string()).with_action(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_registration_policy() {
        assert!(UserPassword::new("Sunflower42!".to_string()).is_ok());

        let err = UserPassword::new("Short1".to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "Password must be at least 8 characters");
        assert_eq!(err.action(), Some("Please choose a longer password"));

        let err = UserPassword::new("Password123".to_string()).unwrap_err();
        assert_eq!(err.action(), Some("Please choose a less predictable password"));

        let err = UserPassword::new("alllowercase1".to_string()).unwrap_err();
        assert_eq!(
            err.message(),
            "Password must contain at least one uppercase letter"
        );
    }

    #[test]
    fn test_sign_in_accepts_legacy_passwords() {
        assert!(UserPassword::for_sign_in("short".to_string()).is_ok());

        let err = UserPassword::for_sign_in("   ".to_string()).unwrap_err();
        assert_eq!(err.message(), "Password is required");
    }

    #[test]
    fn test_confirmation() {
        let password = UserPassword::new("Sunflower42!".to_string()).unwrap();
        assert!(password.matches_confirmation("Sunflower42!"));
        // Fullwidth digits normalize to ASCII under NFKC
        assert!(password.matches_confirmation("Sunflower４２!"));
        assert!(!password.matches_confirmation("Sunflower42"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = UserPassword::new("Sunflower42!".to_string()).unwrap();
        let debug = format!("{password:?}");
        assert!(!debug.contains("Sunflower"));
    }
}

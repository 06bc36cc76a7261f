//! Domain Value Objects
//!
//! Validated field types for todo records.

use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use platform::sanitize::{sanitize_input, sanitize_line};
use serde::{Deserialize, Serialize};

/// Maximum title length (in characters)
pub const TITLE_MAX_LENGTH: usize = 200;

/// Maximum description length (in characters)
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

/// Todo priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(AppError::bad_request(format!(
                "Unknown priority: {other:?}"
            ))
            .with_action("Use low, medium or high")),
        }
    }
}

/// Todo title: single line, 1..=200 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(raw: &str) -> AppResult<Self> {
        let title = sanitize_line(raw);

        if title.is_empty() {
            return Err(AppError::bad_request("Title is required"));
        }

        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Title must be at most {} characters",
                TITLE_MAX_LENGTH
            )));
        }

        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Todo description: free text up to 1000 characters, may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TodoDescription(String);

impl TodoDescription {
    pub fn new(raw: &str) -> AppResult<Self> {
        let description = sanitize_input(raw);

        if description.chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Description must be at most {} characters",
                DESCRIPTION_MAX_LENGTH
            )));
        }

        Ok(Self(description))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serde() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_title_is_sanitized() {
        let title = TodoTitle::new("  Buy\tmilk\u{0007} ").unwrap();
        assert_eq!(title.as_str(), "Buy milk");
    }

    #[test]
    fn test_title_bounds() {
        assert_eq!(
            TodoTitle::new(" \n ").unwrap_err().message(),
            "Title is required"
        );
        assert!(TodoTitle::new(&"t".repeat(200)).is_ok());
        assert!(TodoTitle::new(&"t".repeat(201)).is_err());
        // Counted in characters, not bytes
        assert!(TodoTitle::new(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_description() {
        let description = TodoDescription::new("  line one\nline two\u{0000}  ").unwrap();
        assert_eq!(description.as_str(), "line one\nline two");

        assert!(TodoDescription::new("").unwrap().is_empty());
        assert!(TodoDescription::new(&"d".repeat(1000)).is_ok());
        assert!(TodoDescription::new(&"d".repeat(1001)).is_err());
    }
}

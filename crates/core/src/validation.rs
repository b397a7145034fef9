//! Configuration validation support

use config::ConfigError;
use serde::{Deserialize, Serialize};

/// Trait for validating configuration values
pub trait ValidateConfig: Serialize + for<'de> Deserialize<'de> {
    /// Returns Ok(()) if valid, or an error describing what's wrong
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Common validation helpers
pub mod validators {
    use config::ConfigError;

    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::Message(format!("{field}: cannot be empty")));
        }
        Ok(())
    }

    /// Validate that a string contains `needle`
    pub fn validate_contains(value: &str, needle: &str, field: &str) -> Result<(), ConfigError> {
        if !value.contains(needle) {
            return Err(ConfigError::Message(format!(
                "{field}: must contain '{needle}'"
            )));
        }
        Ok(())
    }

    /// Validate that a value is within range
    pub fn validate_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max {
            return Err(ConfigError::Message(format!(
                "{field}: must be between {min} and {max}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("info", "log_level").is_ok());
        let err = validate_not_empty("  ", "log_level").unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn test_validate_contains() {
        assert!(validate_contains("{} denied", "{}", "message").is_ok());
        assert!(validate_contains("denied", "{}", "message").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10, "code").is_ok());
        assert!(validate_range(0, 1, 10, "code").is_err());
    }
}

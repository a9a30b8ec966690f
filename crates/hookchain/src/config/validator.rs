//! Configuration validation for dispatchers

use super::DispatcherConfig;
use crate::error::{HooksError, Result};

/// Configuration validator for dispatchers
///
/// Checks that:
/// - The dispatcher name is non-empty and contains no whitespace
/// - The slow hook threshold, when set, is greater than zero
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a dispatcher configuration
    ///
    /// # Errors
    ///
    /// Returns [`HooksError::ValidationError`] describing the first invalid value.
    pub fn validate(config: &DispatcherConfig) -> Result<()> {
        Self::validate_name(&config.name)?;

        if config.slow_hook_threshold_ms == Some(0) {
            return Err(HooksError::ValidationError(
                "slow_hook_threshold_ms must be greater than 0 (omit it to disable)".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(HooksError::ValidationError(
                "Dispatcher name cannot be empty".to_string(),
            ));
        }

        if name.chars().any(char::is_whitespace) {
            return Err(HooksError::ValidationError(format!(
                "Invalid dispatcher name: '{}'. Names cannot contain whitespace.",
                name
            )));
        }

        Ok(())
    }
}

//! # Application Error Types
//!
//! This module defines common error types used throughout the ingredient highlighter.
//! It provides structured error handling for pattern building, configuration and input loading.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Ingredient pattern construction errors
    Pattern(String),
    /// Malformed input documents (recipe JSON, etc.)
    Input(String),
    /// File system errors
    FileSystem(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Pattern(msg) => write!(f, "[PATTERN] {}", msg),
            AppError::Input(msg) => write!(f, "[INPUT] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Pattern(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Input(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the crate
pub mod error_logging {
    use tracing::{error, warn};

    /// Log an ingredient whose pattern could not be built.
    ///
    /// This is a degraded-output condition, not a failure: the step is still
    /// rendered, only without this ingredient highlighted.
    pub fn log_pattern_error(
        error: &impl std::fmt::Display,
        ingredient_name: &str,
        step_length: Option<usize>,
    ) {
        warn!(
            error = %error,
            ingredient_name = %ingredient_name,
            step_length = ?step_length,
            "Could not create pattern for ingredient, leaving it unhighlighted"
        );
    }

    /// Log malformed input documents with a truncated excerpt
    pub fn log_input_error(
        error: &impl std::fmt::Display,
        operation: &str,
        source: Option<&str>,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            source = ?source,
            input_value = ?input_value.map(truncate_for_log),
            "Input processing failed"
        );
    }

    /// Log file system errors with path and operation context
    pub fn log_filesystem_error(error: &impl std::fmt::Display, operation: &str, path: Option<&str>) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            "File system operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }

    fn truncate_for_log(value: &str) -> String {
        if value.chars().count() > 100 {
            format!("{}...", value.chars().take(100).collect::<String>())
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_categories() {
        assert_eq!(
            AppError::Config("bad".to_string()).to_string(),
            "[CONFIG] bad"
        );
        assert_eq!(
            AppError::Pattern("too big".to_string()).to_string(),
            "[PATTERN] too big"
        );
        assert_eq!(
            AppError::Input("eof".to_string()).to_string(),
            "[INPUT] eof"
        );
    }

    #[test]
    fn test_conversions() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        assert!(matches!(AppError::from(regex_err), AppError::Pattern(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(AppError::from(json_err), AppError::Input(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(AppError::from(io_err), AppError::FileSystem(_)));
    }

    #[test]
    fn test_logging_helpers_do_not_panic() {
        let long_input = "é".repeat(250);
        error_logging::log_input_error(&"bad json", "parse_recipe", None, Some(&long_input));
        error_logging::log_pattern_error(&"size limit", "tomate", Some(42));
        error_logging::log_filesystem_error(&"denied", "read_recipe", Some("/tmp/x.json"));
        error_logging::log_config_error(&"empty", "HIGHLIGHT_CLASS", "load");
    }
}

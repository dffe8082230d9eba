//! # Unified Application Configuration
//!
//! This module consolidates the annotator and observability settings into a
//! single configuration object. It supports loading from environment
//! variables (a `.env` file is honored by the binary through `dotenvy`) and
//! validation at startup.

use crate::errors::{error_logging, AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use crate::text_processing::DEFAULT_PATTERN_SIZE_LIMIT;
use std::env;

/// Default CSS classes of the highlight marker
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "font-bold text-primary";

/// Default token identifying already highlighted text
pub const DEFAULT_SIGNATURE_TOKEN: &str = "text-primary";

/// Order in which a step's ingredients are matched.
///
/// Each ingredient sees the text produced by the previous ones, so when names
/// overlap ("ail" and "gousse d'ail") the order decides which one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngredientOrdering {
    /// Caller order, unchanged
    #[default]
    AsGiven,
    /// Longest normalized name first, ties keep caller order
    LongestFirst,
}

impl std::str::FromStr for IngredientOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "as_given" | "as-given" => Ok(IngredientOrdering::AsGiven),
            "longest_first" | "longest-first" => Ok(IngredientOrdering::LongestFirst),
            other => Err(AppError::Config(format!(
                "INGREDIENT_ORDERING must be 'as_given' or 'longest_first', got '{}'",
                other
            ))),
        }
    }
}

/// Inline wrapper placed around recognized ingredient mentions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    /// CSS classes of the wrapping `<span>`
    pub class: String,
    /// Token whose presence in matched text marks it as already highlighted
    pub signature_token: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
            signature_token: DEFAULT_SIGNATURE_TOKEN.to_string(),
        }
    }
}

impl HighlightConfig {
    pub fn opening_marker(&self) -> String {
        format!("<span class=\"{}\">", self.class)
    }

    pub fn closing_marker(&self) -> &'static str {
        "</span>"
    }

    /// Validate highlight configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.class.trim().is_empty() {
            return Err(AppError::Config("Highlight class cannot be empty".to_string()));
        }

        if self.class.contains(&['"', '<', '>'][..]) {
            return Err(AppError::Config(format!(
                "Highlight class '{}' cannot contain quotes or angle brackets",
                self.class
            )));
        }

        if self.signature_token.trim().is_empty() {
            return Err(AppError::Config(
                "Highlight signature token cannot be empty".to_string(),
            ));
        }

        if !self.class.contains(&self.signature_token) {
            return Err(AppError::Config(format!(
                "Highlight class '{}' must contain the signature token '{}'",
                self.class, self.signature_token
            )));
        }

        Ok(())
    }
}

/// Step annotator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatorConfig {
    pub highlight: HighlightConfig,
    pub ordering: IngredientOrdering,
    /// Compiled size limit of a single ingredient pattern, in bytes
    pub pattern_size_limit: usize,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            highlight: HighlightConfig::default(),
            ordering: IngredientOrdering::AsGiven,
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }
}

impl AnnotatorConfig {
    /// Validate annotator configuration
    pub fn validate(&self) -> AppResult<()> {
        self.highlight.validate()?;

        if self.pattern_size_limit == 0 {
            return Err(AppError::Config(
                "PATTERN_SIZE_LIMIT must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub annotator: AnnotatorConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.annotator.highlight.class =
            env::var("HIGHLIGHT_CLASS").unwrap_or_else(|_| DEFAULT_HIGHLIGHT_CLASS.to_string());
        config.annotator.highlight.signature_token = env::var("HIGHLIGHT_SIGNATURE_TOKEN")
            .unwrap_or_else(|_| DEFAULT_SIGNATURE_TOKEN.to_string());
        config.annotator.ordering = env::var("INGREDIENT_ORDERING")
            .unwrap_or_else(|_| "as_given".to_string())
            .parse()?;
        config.annotator.pattern_size_limit = env::var("PATTERN_SIZE_LIMIT")
            .unwrap_or_else(|_| DEFAULT_PATTERN_SIZE_LIMIT.to_string())
            .parse()
            .map_err(|e| {
                error_logging::log_config_error(&e, "PATTERN_SIZE_LIMIT", "from_env");
                AppError::Config("PATTERN_SIZE_LIMIT must be a valid number".to_string())
            })?;

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.annotator.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: highlight_class='{}', ordering={:?}, pattern_size_limit={}, environment={}",
            self.annotator.highlight.class,
            self.annotator.ordering,
            self.annotator.pattern_size_limit,
            self.observability.environment
        )
    }
}

//! Observability module for logging setup and metrics recording.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics recording functions for the pattern cache and step annotation
//! - Tracing span creation utilities
//!
//! The crate never installs a metrics recorder itself. Without one, the
//! `record_*` functions are no-ops, so they are safe to call from tests.

use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::prelude::*;

use crate::observability_config::{LogFormat, ObservabilityConfig};

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("ingredient_highlighter={}", config.log_level.to_lowercase()).parse()?,
    );

    // Pretty formatting for development, JSON for others
    match config.effective_log_format() {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized"
    );
    Ok(())
}

/// Span covering the annotation of one step
pub fn annotation_span(ingredient_count: usize) -> tracing::Span {
    tracing::debug_span!("annotate_step", ingredient_count = ingredient_count)
}

/// Outcome of one pattern construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternBuildOutcome {
    Success,
    Failure,
    /// The name normalized to nothing
    Never,
}

impl PatternBuildOutcome {
    fn as_label(self) -> &'static str {
        match self {
            PatternBuildOutcome::Success => "success",
            PatternBuildOutcome::Failure => "failure",
            PatternBuildOutcome::Never => "never",
        }
    }
}

/// Record a pattern cache lookup
pub fn record_pattern_cache_lookup(hit: bool) {
    metrics::counter!("pattern_cache_lookups_total", "result" => if hit { "hit" } else { "miss" })
        .increment(1);
}

/// Record a pattern construction and its duration
pub fn record_pattern_build(outcome: PatternBuildOutcome, duration: Duration) {
    metrics::counter!("pattern_builds_total", "result" => outcome.as_label()).increment(1);
    metrics::histogram!("pattern_build_duration_seconds").record(duration.as_secs_f64());
}

/// Record the annotation of one step
pub fn record_step_annotation(highlights: usize, duration: Duration) {
    metrics::counter!("step_annotations_total").increment(1);
    metrics::counter!("step_highlights_total").increment(highlights as u64);
    metrics::histogram!("step_annotation_duration_seconds").record(duration.as_secs_f64());
}

/// Record error metrics
pub fn record_error_metrics(error_type: &str, component: &str) {
    metrics::counter!(
        "errors_total",
        "error_type" => error_type.to_string(),
        "component" => component.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording_without_recorder() {
        record_pattern_cache_lookup(true);
        record_pattern_cache_lookup(false);
        record_pattern_build(PatternBuildOutcome::Success, Duration::from_micros(40));
        record_pattern_build(PatternBuildOutcome::Never, Duration::ZERO);
        record_step_annotation(3, Duration::from_micros(120));
        record_error_metrics("pattern", "annotation");
    }

    #[test]
    fn test_invalid_config_is_rejected_before_init() {
        let config = ObservabilityConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(init_tracing_with_config(&config).is_err());
    }

    #[test]
    fn test_annotation_span_creation() {
        let span = annotation_span(4);
        let _guard = span.enter();
    }
}

//! # Step Annotation
//!
//! Wraps every ingredient mention in a cooking step with a highlight marker
//! carrying the ingredient's quantity and unit:
//!
//! ```text
//! "Coupez les tomates."  +  tomate (3)
//! "Coupez les <span class=\"font-bold text-primary\">tomates (3)</span>."
//! ```
//!
//! Ingredients are applied one after the other, each one scanning the text
//! produced by the previous ones. Text that is already inside a highlight is
//! never wrapped again, which also makes annotation idempotent.

use lazy_static::lazy_static;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

use crate::cache::PatternCache;
use crate::config::{AnnotatorConfig, HighlightConfig, IngredientOrdering};
use crate::errors::{error_logging, AppResult};
use crate::observability;
use crate::recipe::Ingredient;
use crate::text_processing::{
    is_mention_prefix, normalize_ingredient_name, IngredientMatch, IngredientPattern,
};

lazy_static! {
    static ref DEFAULT_ANNOTATOR: StepAnnotator = StepAnnotator::default();
}

/// Process-wide annotator with the default configuration and a shared pattern cache
pub fn default_annotator() -> &'static StepAnnotator {
    &DEFAULT_ANNOTATOR
}

/// Annotate a step with the process-wide default annotator.
///
/// # Examples
///
/// ```rust
/// use ingredient_highlighter::annotation::render_step_text;
/// use ingredient_highlighter::recipe::Ingredient;
///
/// let ingredients = vec![Ingredient::new("l'ail", Some(2.0), Some("gousses"))];
/// let html = render_step_text("Hachez l'ail.", &ingredients);
/// assert_eq!(
///     html,
///     "Hachez l'<span class=\"font-bold text-primary\">ail (2 gousses)</span>."
/// );
/// ```
pub fn render_step_text(description: &str, ingredients: &[Ingredient]) -> String {
    DEFAULT_ANNOTATOR.render_step_text(description, ingredients)
}

/// Byte ranges of the spans already wrapped by the highlight marker
fn highlighted_spans(text: &str, highlight: &HighlightConfig) -> Vec<Range<usize>> {
    let opening = highlight.opening_marker();
    let closing = highlight.closing_marker();

    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find(&opening) {
        let start = pos + found;
        let content_start = start + opening.len();
        let end = text[content_start..]
            .find(closing)
            .map_or(text.len(), |i| content_start + i + closing.len());
        spans.push(start..end);
        pos = end;
    }
    spans
}

/// Whether the mention was the article in front of a later highlight.
///
/// With an ingredient named like an article ("des" in "des des"), the first
/// pass keeps the first word as the prefix of the second; that word must stay
/// plain on later passes.
fn absorbed_as_prefix(text: &str, found: &IngredientMatch, span: &Range<usize>) -> bool {
    span.start >= found.end && is_mention_prefix(&text[found.core_start..span.start])
}

/// Annotates step descriptions with ingredient highlights
#[derive(Debug)]
pub struct StepAnnotator {
    config: AnnotatorConfig,
    cache: Arc<PatternCache>,
}

impl Default for StepAnnotator {
    fn default() -> Self {
        let config = AnnotatorConfig::default();
        let cache = Arc::new(PatternCache::new(config.pattern_size_limit));
        Self { config, cache }
    }
}

impl StepAnnotator {
    /// Create an annotator with its own pattern cache
    pub fn with_config(config: AnnotatorConfig) -> AppResult<Self> {
        let cache = Arc::new(PatternCache::new(config.pattern_size_limit));
        Self::with_cache(config, cache)
    }

    /// Create an annotator sharing an existing pattern cache.
    ///
    /// The cache keeps its own size limit; share it only between annotators
    /// configured alike.
    pub fn with_cache(config: AnnotatorConfig, cache: Arc<PatternCache>) -> AppResult<Self> {
        config.validate()?;
        debug!(
            highlight_class = %config.highlight.class,
            ordering = ?config.ordering,
            "Creating StepAnnotator"
        );
        Ok(Self { config, cache })
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Ingredients in the order they will be matched
    fn matching_order<'a>(&self, ingredients: &'a [Ingredient]) -> Vec<&'a Ingredient> {
        let mut ordered: Vec<&Ingredient> = ingredients.iter().collect();
        if self.config.ordering == IngredientOrdering::LongestFirst {
            ordered.sort_by_cached_key(|ingredient| {
                std::cmp::Reverse(normalize_ingredient_name(&ingredient.name).chars().count())
            });
        }
        ordered
    }

    /// Highlight every ingredient mention in `description`.
    ///
    /// Never fails: an ingredient whose pattern cannot be built is logged and
    /// left unhighlighted, the others are still applied.
    pub fn render_step_text(&self, description: &str, ingredients: &[Ingredient]) -> String {
        if ingredients.is_empty() {
            return description.to_string();
        }

        let span = observability::annotation_span(ingredients.len());
        let _enter = span.enter();
        let start = Instant::now();
        let mut highlights = 0;

        let rendered = self.matching_order(ingredients).into_iter().fold(
            description.to_string(),
            |text, ingredient| match self.cache.get_or_build(&ingredient.name) {
                Ok(pattern) => {
                    let (text, count) = self.highlight_ingredient(text, &pattern, ingredient);
                    highlights += count;
                    text
                }
                Err(e) => {
                    error_logging::log_pattern_error(&e, &ingredient.name, Some(description.len()));
                    observability::record_error_metrics("pattern", "annotation");
                    text
                }
            },
        );

        observability::record_step_annotation(highlights, start.elapsed());
        rendered
    }

    /// One fold step: wrap the mentions of a single ingredient.
    ///
    /// Returns the new text and the number of mentions wrapped.
    fn highlight_ingredient(
        &self,
        text: String,
        pattern: &IngredientPattern,
        ingredient: &Ingredient,
    ) -> (String, usize) {
        let matches = pattern.find_matches(&text);
        if matches.is_empty() {
            return (text, 0);
        }

        let highlight = &self.config.highlight;
        let protected = highlighted_spans(&text, highlight);
        let opening = highlight.opening_marker();
        let closing = highlight.closing_marker();
        let annotation = ingredient.display_quantity();

        let mut output = String::with_capacity(text.len() + matches.len() * (opening.len() + 32));
        let mut last = 0;
        let mut count = 0;

        for found in &matches {
            let already_highlighted = found.as_str(&text).contains(&highlight.signature_token)
                || protected.iter().any(|span| {
                    (found.prefix_start < span.end && found.end > span.start)
                        || absorbed_as_prefix(&text, found, span)
                });
            if already_highlighted {
                trace!(matched = %found.as_str(&text), "Skipping already highlighted text");
                continue;
            }

            output.push_str(&text[last..found.start]);
            output.push_str(found.boundary(&text));
            output.push_str(found.prefix(&text));
            output.push_str(&opening);
            output.push_str(found.core(&text));
            output.push_str(" (");
            output.push_str(&annotation);
            output.push(')');
            output.push_str(closing);
            last = found.end;
            count += 1;
        }

        if count == 0 {
            return (text, 0);
        }
        output.push_str(&text[last..]);
        (output, count)
    }
}

//! # Text Processing Module
//!
//! This module turns French ingredient names into fuzzy matching patterns and
//! locates their mentions inside free-text cooking steps.
//!
//! ## Features
//!
//! - Name normalization: strips a leading elision (`d'`, `l'`) and one leading
//!   article or partitive (`de la`, `des`, `au`...)
//! - Accent tolerance: `pates` matches `pâtes`, `creme` matches `crème`
//! - Gender/number tolerance: `tomate` matches `tomates`, `poireau` matches `poireaux`
//! - Word boundaries: `ail` never matches inside `détail` or `ailleurs`
//! - Prefix capture: the article/elision in front of a mention is captured so it
//!   can be kept outside the highlight

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use tracing::{debug, trace};

use crate::errors::AppResult;

/// Default compiled size limit for a single ingredient pattern (1 MiB)
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Start of text, or a character that may precede a word in running prose
const BOUNDARY: &str = r#"(?P<boundary>^|[\s\x{A0}'’"(\[>,:;!?.\-])"#;

/// Optional article/partitive followed by an optional elision, kept out of the highlight
const PREFIX: &str = r"(?P<prefix>(?:(?:de[\s\x{A0}]+la|de|du|des|le|la|les|un|une|aux|au|à[\s\x{A0}]+la|à)[\s\x{A0}]+)?(?:[dl]['’])?)";

/// Right word boundary. The `regex` crate has no look-ahead, so this consumes
/// at most one character and the scanner resumes right after the core.
const RIGHT_BOUNDARY: &str = r"(?-i:$|[^0-9A-Za-z_\x{C0}-\x{FF}])";

/// Separator between the words of a multi-word ingredient
const WORD_SEPARATOR: &str = r"[\s\x{A0}]+";

/// Inflection suffix allowed after the root of words longer than two characters
const LONG_WORD_SUFFIX: &str = "(?:[eéèêë]*(?:s|x)?)?";

/// Plural suffix allowed after words of two characters or fewer
const SHORT_WORD_SUFFIX: &str = "(?:s|x)?";

lazy_static! {
    static ref ELISION_REGEX: Regex =
        Regex::new(r"(?i)^[dl]['’]").expect("Elision pattern should be valid");
    static ref ARTICLE_REGEX: Regex = Regex::new(
        r"(?i)^(?:de la|de|du|des|le|la|les|un|une|aux|au|à la|à)[\s\x{A0}]+"
    )
    .expect("Article pattern should be valid");
    static ref INFLECTION_SUFFIX_REGEX: Regex =
        Regex::new(r"(?i)[eéèêë]*[sx]?$").expect("Inflection suffix pattern should be valid");
    static ref WHOLE_PREFIX_REGEX: Regex = Regex::new(&format!("(?i)^{}$", PREFIX))
        .expect("Prefix pattern should be valid");
}

/// Reduce an ingredient name to the core used for matching.
///
/// At most one elision and one article are removed, in that order, then the
/// result is trimmed. An empty result means the ingredient cannot be matched.
///
/// # Examples
///
/// ```rust
/// use ingredient_highlighter::text_processing::normalize_ingredient_name;
///
/// assert_eq!(normalize_ingredient_name("l'ail"), "ail");
/// assert_eq!(normalize_ingredient_name("de la farine"), "farine");
/// assert_eq!(normalize_ingredient_name("Des tomates cerises"), "tomates cerises");
/// ```
pub fn normalize_ingredient_name(name: &str) -> String {
    let without_elision = ELISION_REGEX.replace(name, "");
    let without_article = ARTICLE_REGEX.replace(&without_elision, "");
    without_article.trim().to_string()
}

/// Whether `text` is exactly an article/elision prefix as captured in front of a mention,
/// e.g. `"des "`, `"de l'"` or `"l’"`
pub fn is_mention_prefix(text: &str) -> bool {
    !text.is_empty() && WHOLE_PREFIX_REGEX.is_match(text)
}

/// Accent class for a base letter, decided on its lowercase form
fn accent_class(c: char) -> Option<&'static str> {
    match c.to_ascii_lowercase() {
        'a' => Some("[aàâä]"),
        'e' => Some("[eéèêë]"),
        'i' => Some("[iîï]"),
        'o' => Some("[oôö]"),
        'u' => Some("[uùûü]"),
        'c' => Some("[cç]"),
        'n' => Some("[nñ]"),
        _ => None,
    }
}

fn char_pattern(c: char) -> String {
    match accent_class(c) {
        Some(class) => class.to_string(),
        None => {
            let mut buf = [0u8; 4];
            regex::escape(c.encode_utf8(&mut buf))
        }
    }
}

/// Build the sub-pattern for one word of an ingredient name
fn word_pattern(word: &str) -> String {
    let is_long = word.chars().count() > 2;
    let root = if is_long {
        INFLECTION_SUFFIX_REGEX.replace(word, "")
    } else {
        Cow::Borrowed(word)
    };

    let mut pattern: String = root.chars().map(char_pattern).collect();
    pattern.push_str(if is_long {
        LONG_WORD_SUFFIX
    } else {
        SHORT_WORD_SUFFIX
    });
    pattern
}

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{A0}'
}

/// Core pattern for a normalized name: one sub-pattern per word, whitespace between
pub fn core_pattern(normalized_name: &str) -> String {
    normalized_name
        .split(is_word_separator)
        .filter(|word| !word.is_empty())
        .map(word_pattern)
        .collect::<Vec<_>>()
        .join(WORD_SEPARATOR)
}

/// A mention of an ingredient found in a step.
///
/// Offsets are byte offsets into the scanned text:
/// `start..prefix_start` is the boundary character (empty at start of text),
/// `prefix_start..core_start` the article/elision, `core_start..end` the
/// highlighted ingredient text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientMatch {
    pub start: usize,
    pub prefix_start: usize,
    pub core_start: usize,
    pub end: usize,
}

impl IngredientMatch {
    pub fn boundary<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.prefix_start]
    }

    pub fn prefix<'t>(&self, text: &'t str) -> &'t str {
        &text[self.prefix_start..self.core_start]
    }

    pub fn core<'t>(&self, text: &'t str) -> &'t str {
        &text[self.core_start..self.end]
    }

    /// Full matched text, boundary included
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Compiled matching pattern for one ingredient name
#[derive(Debug, Clone)]
pub enum IngredientPattern {
    /// The name normalized to nothing; matches no text
    Never,
    /// A compiled case-insensitive pattern
    Compiled {
        /// Normalized core name the pattern was built from
        core_name: String,
        regex: Regex,
    },
}

impl IngredientPattern {
    pub fn is_never(&self) -> bool {
        matches!(self, IngredientPattern::Never)
    }

    pub fn core_name(&self) -> Option<&str> {
        match self {
            IngredientPattern::Never => None,
            IngredientPattern::Compiled { core_name, .. } => Some(core_name),
        }
    }

    /// Get the regex pattern as a string (for testing purposes)
    pub fn pattern_str(&self) -> Option<&str> {
        match self {
            IngredientPattern::Never => None,
            IngredientPattern::Compiled { regex, .. } => Some(regex.as_str()),
        }
    }

    /// Find all non-overlapping mentions in `text`, left to right.
    ///
    /// Each search resumes right after the previous core, so the character
    /// that closed one mention can open the next one. Mentions with an empty
    /// core are dropped.
    pub fn find_matches(&self, text: &str) -> Vec<IngredientMatch> {
        let IngredientPattern::Compiled { regex, .. } = self else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        let mut pos = 0;
        while pos <= text.len() {
            let Some(caps) = regex.captures_at(text, pos) else {
                break;
            };
            let (Some(boundary), Some(prefix), Some(core)) =
                (caps.name("boundary"), caps.name("prefix"), caps.name("core"))
            else {
                break;
            };

            let found = IngredientMatch {
                start: boundary.start(),
                prefix_start: prefix.start(),
                core_start: core.start(),
                end: core.end(),
            };

            pos = if found.end > pos {
                found.end
            } else {
                pos + text[pos..].chars().next().map_or(1, char::len_utf8)
            };

            if found.core_start < found.end {
                trace!(
                    matched = %found.as_str(text),
                    start = found.start,
                    end = found.end,
                    "Ingredient mention found"
                );
                matches.push(found);
            }
        }
        matches
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.find_matches(text).is_empty()
    }
}

/// Build the matching pattern for a raw ingredient name.
///
/// Returns [`IngredientPattern::Never`] when the name normalizes to nothing.
/// Fails with [`crate::errors::AppError::Pattern`] when the pattern cannot be
/// compiled, for example when it exceeds `size_limit`.
///
/// # Examples
///
/// ```rust
/// use ingredient_highlighter::text_processing::{build_ingredient_pattern, DEFAULT_PATTERN_SIZE_LIMIT};
///
/// let pattern = build_ingredient_pattern("tomate", DEFAULT_PATTERN_SIZE_LIMIT)?;
/// assert!(pattern.is_match("Coupez les Tomates en dés."));
/// assert!(!pattern.is_match("Coupez les tomatilles."));
/// # Ok::<(), ingredient_highlighter::errors::AppError>(())
/// ```
pub fn build_ingredient_pattern(raw_name: &str, size_limit: usize) -> AppResult<IngredientPattern> {
    let core_name = normalize_ingredient_name(raw_name);
    if core_name.is_empty() {
        debug!(ingredient_name = %raw_name, "Ingredient name is empty after normalization");
        return Ok(IngredientPattern::Never);
    }

    let pattern = format!(
        "(?i){}{}(?P<core>{}){}",
        BOUNDARY,
        PREFIX,
        core_pattern(&core_name),
        RIGHT_BOUNDARY
    );
    let regex = RegexBuilder::new(&pattern).size_limit(size_limit).build()?;

    debug!(
        ingredient_name = %raw_name,
        core_name = %core_name,
        "Built ingredient pattern"
    );
    Ok(IngredientPattern::Compiled { core_name, regex })
}

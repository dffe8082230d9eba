//! # Ingredient Highlighter
//!
//! Highlights ingredient mentions in French recipe steps and annotates them
//! with the ingredient's quantity and unit, tolerating elision, leading
//! articles, accents and plural/feminine endings.

pub mod annotation;
pub mod cache;
pub mod config;
pub mod errors;
pub mod observability;
pub mod observability_config;
pub mod quantity;
pub mod recipe;
pub mod text_processing;

// Re-export types for easier access
pub use annotation::{render_step_text, StepAnnotator};
pub use quantity::format_quantity;
pub use recipe::{Ingredient, Recipe, RenderedStep, Step};

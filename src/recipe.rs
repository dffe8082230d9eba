//! # Recipe Model
//!
//! Recipes as stored by the recipe-sharing application: a title, an ordered
//! ingredient list and numbered steps. Recipes are loaded from JSON documents
//! and rendered step by step with ingredient highlights.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::annotation::StepAnnotator;
use crate::errors::{error_logging, AppError, AppResult};
use crate::quantity::format_quantity;

/// One entry of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Free-text French name, possibly with a leading article ("de la farine")
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Display position within the recipe
    #[serde(default)]
    pub order: Option<i32>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: Option<f64>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.map(str::to_string),
            order: None,
        }
    }

    /// Unit to display, `None` when absent or empty
    pub fn display_unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|unit| !unit.is_empty())
    }

    /// Formatted quantity followed by the unit, as shown in step annotations
    ///
    /// ```rust
    /// use ingredient_highlighter::recipe::Ingredient;
    ///
    /// let ingredient = Ingredient::new("sucre", Some(0.5), Some("cuillère à soupe"));
    /// assert_eq!(ingredient.display_quantity(), "½ cuillère à soupe");
    /// ```
    pub fn display_quantity(&self) -> String {
        match self.display_unit() {
            Some(unit) => format!("{} {}", format_quantity(self.quantity), unit),
            None => format_quantity(self.quantity),
        }
    }
}

/// One numbered instruction of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub step_number: i32,
    pub description: String,
}

/// A recipe with its ingredients and steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A step description with ingredient highlights applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedStep {
    pub step_number: i32,
    pub html: String,
}

impl Recipe {
    /// Parse a recipe from a JSON document
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            error_logging::log_input_error(&e, "parse_recipe", None, Some(json));
            AppError::Input(format!("Invalid recipe JSON: {}", e))
        })
    }

    /// Ingredients by display order; unordered ones follow in their original order
    pub fn ordered_ingredients(&self) -> Vec<Ingredient> {
        let mut ingredients = self.ingredients.clone();
        ingredients.sort_by_key(|ingredient| (ingredient.order.is_none(), ingredient.order));
        ingredients
    }

    /// Steps by step number
    pub fn ordered_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.step_number);
        steps
    }

    /// Render every step, in step order, against the ordered ingredient list
    pub fn render_steps(&self, annotator: &StepAnnotator) -> Vec<RenderedStep> {
        let ingredients = self.ordered_ingredients();
        let rendered: Vec<RenderedStep> = self
            .ordered_steps()
            .into_iter()
            .map(|step| RenderedStep {
                step_number: step.step_number,
                html: annotator.render_step_text(&step.description, &ingredients),
            })
            .collect();

        debug!(
            recipe_id = ?self.id,
            steps = rendered.len(),
            ingredients = ingredients.len(),
            "Rendered recipe steps"
        );
        rendered
    }
}

/// Load a recipe from a JSON file
pub fn load_recipe(path: impl AsRef<Path>) -> AppResult<Recipe> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        error_logging::log_filesystem_error(&e, "read_recipe", path.to_str());
        AppError::FileSystem(format!("Failed to read '{}': {}", path.display(), e))
    })?;

    let recipe = Recipe::from_json_str(&content)?;
    info!(
        path = %path.display(),
        title = %recipe.title,
        "Loaded recipe"
    );
    Ok(recipe)
}

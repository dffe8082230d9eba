use anyhow::Result;
use ingredient_highlighter::annotation::StepAnnotator;
use ingredient_highlighter::config::AppConfig;
use ingredient_highlighter::errors::error_logging;
use ingredient_highlighter::observability;
use ingredient_highlighter::recipe::{self, Recipe};
use std::env;
use std::io::{self, Read, Write};
use tracing::info;

/// Read the recipe from the path given as first argument, or from stdin
fn read_recipe() -> Result<Recipe> {
    match env::args().nth(1) {
        Some(path) if path != "-" => Ok(recipe::load_recipe(&path)?),
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(Recipe::from_json_str(&input)?)
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    config.validate().map_err(|e| {
        error_logging::log_config_error(&e, "environment", "validate");
        anyhow::anyhow!(
            "Configuration validation failed: {}. Please check your environment variables.",
            e
        )
    })?;

    observability::init_tracing_with_config(&config.observability)?;
    info!("{}", config.summary());

    let annotator = StepAnnotator::with_config(config.annotator)?;
    let recipe = read_recipe()?;
    let rendered = recipe.render_steps(&annotator);

    let stats = annotator.cache().stats();
    info!(
        title = %recipe.title,
        steps = rendered.len(),
        cached_patterns = stats.entries,
        cache_hit_rate = stats.hit_rate,
        "Recipe rendered"
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &rendered)?;
    writeln!(stdout)?;
    Ok(())
}

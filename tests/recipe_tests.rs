//! # Recipe Loading and Rendering Tests

#[cfg(test)]
mod tests {
    use ingredient_highlighter::annotation::StepAnnotator;
    use ingredient_highlighter::errors::AppError;
    use ingredient_highlighter::recipe::{load_recipe, Recipe};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RECIPE_JSON: &str = r#"{
        "id": 42,
        "title": "Ratatouille",
        "ingredients": [
            {"name": "des courgettes", "quantity": 2, "unit": null, "order": 2},
            {"name": "d'huile d'olive", "quantity": 3, "unit": "cuillères à soupe", "order": 1},
            {"name": "tomate", "quantity": 4, "unit": null, "order": 3},
            {"name": "thym", "quantity": null, "unit": "branche"}
        ],
        "steps": [
            {"step_number": 2, "description": "Ajoutez les courgettes et les tomates, puis le thym."},
            {"step_number": 1, "description": "Faites chauffer l'huile d'olive."}
        ]
    }"#;

    fn write_recipe(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_recipe_from_file() {
        let file = write_recipe(RECIPE_JSON);
        let recipe = load_recipe(file.path()).unwrap();

        assert_eq!(recipe.id, Some(42));
        assert_eq!(recipe.title, "Ratatouille");
        assert_eq!(recipe.ingredients.len(), 4);
        assert_eq!(recipe.steps.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_recipe(dir.path().join("absent.json"));
        assert!(matches!(result, Err(AppError::FileSystem(_))));
    }

    #[test]
    fn test_load_invalid_json_is_input_error() {
        let file = write_recipe("not a recipe");
        assert!(matches!(load_recipe(file.path()), Err(AppError::Input(_))));
    }

    #[test]
    fn test_render_steps_end_to_end() {
        let recipe = Recipe::from_json_str(RECIPE_JSON).unwrap();
        let annotator = StepAnnotator::default();
        let rendered = recipe.render_steps(&annotator);

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].step_number, 1);
        assert_eq!(
            rendered[0].html,
            "Faites chauffer l'<span class=\"font-bold text-primary\">huile d'olive (3 cuillères à soupe)</span>."
        );
        assert_eq!(rendered[1].step_number, 2);
        assert_eq!(
            rendered[1].html,
            "Ajoutez les <span class=\"font-bold text-primary\">courgettes (2)</span> et les \
             <span class=\"font-bold text-primary\">tomates (4)</span>, puis le \
             <span class=\"font-bold text-primary\">thym ( branche)</span>."
        );
    }

    #[test]
    fn test_rendered_steps_serialize_to_json() {
        let recipe = Recipe::from_json_str(RECIPE_JSON).unwrap();
        let rendered = recipe.render_steps(&StepAnnotator::default());
        let json = serde_json::to_value(&rendered).unwrap();

        assert_eq!(json[0]["step_number"], 1);
        assert!(json[1]["html"].as_str().unwrap().contains("tomates (4)"));
    }

    #[test]
    fn test_recipe_without_ingredients_renders_plain_steps() {
        let recipe = Recipe::from_json_str(
            r#"{"title": "Eau chaude", "steps": [{"step_number": 1, "description": "Faites bouillir."}]}"#,
        )
        .unwrap();
        let rendered = recipe.render_steps(&StepAnnotator::default());
        assert_eq!(rendered[0].html, "Faites bouillir.");
    }
}

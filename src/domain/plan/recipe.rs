//! Generated recipes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::normalizer::extract_json_object;

/// Recipe in the shape the generator is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Free-form values such as `"450 kcal"`; generators are inconsistent
    /// about numbers versus strings here.
    #[serde(default)]
    pub nutrition: Map<String, Value>,
}

/// Result of reading a generated recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecipeOutcome {
    Structured { recipe: Recipe },
    /// The text was not a recipe document; it is still returned so the user
    /// can read it.
    Fallback { raw_response: String },
}

impl RecipeOutcome {
    /// Reads generated text as a recipe, after stripping fences and prose.
    pub fn from_generated(raw: &str) -> Self {
        let parsed = serde_json::from_str::<Recipe>(raw)
            .or_else(|_| serde_json::from_str::<Recipe>(extract_json_object(raw)));

        match parsed {
            Ok(recipe) => RecipeOutcome::Structured { recipe },
            Err(e) => {
                tracing::debug!(error = %e, "Generated recipe was not a recipe document");
                RecipeOutcome::Fallback {
                    raw_response: raw.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_recipe_is_structured() {
        let raw = "```json\n{\"name\": \"Lentil soup\", \"ingredients\": [\"lentils\", \"carrot\"], \"instructions\": [\"simmer\"], \"nutrition\": {\"calories\": \"420\", \"protein\": 24}}\n```";

        match RecipeOutcome::from_generated(raw) {
            RecipeOutcome::Structured { recipe } => {
                assert_eq!(recipe.name, "Lentil soup");
                assert_eq!(recipe.ingredients.len(), 2);
                assert_eq!(recipe.nutrition["protein"], 24);
            }
            other => panic!("expected structured recipe, got {:?}", other),
        }
    }

    #[test]
    fn prose_recipe_is_kept_as_fallback() {
        let raw = "Ingredients:\n- 2 eggs\nSteps:\n1. Whisk";
        let outcome = RecipeOutcome::from_generated(raw);
        assert_eq!(
            outcome,
            RecipeOutcome::Fallback {
                raw_response: raw.to_string()
            }
        );

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["raw_response"], raw);
    }
}

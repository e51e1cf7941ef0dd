use anyhow::Context;
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::generation::{parser, GenerationError, RetryPolicy};
use crate::state::AppState;

const REQUIRED_RECIPE_FIELDS: [&str; 3] = ["name", "ingredients", "instructions"];

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("incomplete recipe data: missing {0}")]
    IncompleteRecipeData(&'static str),
}

fn recipe_prompt(food_item: &str) -> String {
    format!(
        r#"You are a recipe generator. Generate a recipe for "{food_item}".

IMPORTANT: Return ONLY a valid JSON object with no additional text, explanations, or markdown.

Format:
{{
  "name": "Recipe Name",
  "ingredients": ["ingredient 1", "ingredient 2", "ingredient 3"],
  "instructions": ["step 1", "step 2", "step 3"],
  "calories": "approximate calories per serving",
  "prepTime": "15 minutes",
  "cookTime": "30 minutes",
  "totalTime": "45 minutes",
  "servings": "4"
}}

JSON:"#
    )
}

fn analysis_prompt(food: &str) -> String {
    format!(
        r#"Analyze nutritional info for "{food}".

Return ONLY valid JSON with no extra text:
{{
  "calories": "number",
  "protein": "number in grams",
  "carbs": "number in grams",
  "fat": "number in grams"
}}

JSON:"#
    )
}

/// Short content request: normal deadline, configured retry policy.
async fn request_content(state: &AppState, prompt: &str) -> Result<Value, GenerationError> {
    let cfg = &state.config.generation;
    let cancel = CancellationToken::new();
    let raw = state
        .generator
        .generate_with_retry(prompt, cfg.timeout, RetryPolicy::from_config(cfg), &cancel)
        .await?;
    info!(len = raw.len(), "content generation received");
    parser::parse(&raw)
}

pub async fn generate_recipe(state: &AppState, food_item: &str) -> Result<Value, RecipeError> {
    let recipe = request_content(state, &recipe_prompt(food_item)).await?;
    check_recipe(&recipe)?;
    Ok(recipe)
}

/// There is no template to fall back on for free-form recipes, so the
/// generated object must carry the fields the UI renders.
fn check_recipe(recipe: &Value) -> Result<(), RecipeError> {
    for field in REQUIRED_RECIPE_FIELDS {
        let present = match recipe.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };
        if !present {
            return Err(RecipeError::IncompleteRecipeData(field));
        }
    }
    Ok(())
}

pub async fn analyze_food(state: &AppState, food: &str) -> Result<Value, GenerationError> {
    request_content(state, &analysis_prompt(food)).await
}

/// Image link for `prompt`; no network call is made.
///
/// The prompt is encoded as a URI component: only ASCII alphanumerics and
/// `-_.~` are left as-is.
pub fn image_url(base_url: &str, prompt: &str) -> anyhow::Result<String> {
    let base = Url::parse(base_url).context("parse image base url")?;
    anyhow::ensure!(!base.cannot_be_a_base(), "image base url cannot carry a path");
    let mut link = base.to_string();
    if !link.ends_with('/') {
        link.push('/');
    }
    Ok(format!(
        "{link}{}?width=800&height=600&nologo=true",
        urlencoding::encode(prompt)
    ))
}

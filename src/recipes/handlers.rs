use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::dto::{required_text, AnalyzeRequest, ImageRequest, ImageResponse, RecipeRequest, RecipeResponse};
use super::services::{self, RecipeError};
use crate::{error::ApiError, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe", post(generate_recipe))
        .route("/analyze", post(analyze_food))
        .route("/generate-image", post(generate_image))
}

fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(e) => {
            warn!(error = %e, "request body rejected");
            T::default()
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn generate_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let food_item = required_text(body_or_default(payload).food_item)
        .ok_or_else(|| ApiError::bad_request("Food item required"))?;

    info!(%food_item, "generating recipe");
    match services::generate_recipe(&state, &food_item).await {
        Ok(recipe) => Ok(Json(RecipeResponse { recipe })),
        Err(e) => {
            let kind = match &e {
                RecipeError::Generation(g) => g.kind(),
                RecipeError::IncompleteRecipeData(_) => "IncompleteRecipeData",
            };
            error!(error = %e, kind, %food_item, "recipe generation failed");
            Err(ApiError::internal("Cannot generate recipe").with_details(e))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn analyze_food(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let food = required_text(body_or_default(payload).food)
        .ok_or_else(|| ApiError::bad_request("Food required"))?;

    match services::analyze_food(&state, &food).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            error!(error = %e, kind = e.kind(), %food, "food analysis failed");
            Err(ApiError::internal("Cannot analyze food"))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let prompt = required_text(body_or_default(payload).prompt)
        .ok_or_else(|| ApiError::bad_request("Prompt required"))?;

    let image_url = services::image_url(&state.config.image_base_url, &prompt).map_err(|e| {
        error!(error = %e, "image url build failed");
        ApiError::internal("Cannot generate image")
    })?;
    Ok(Json(ImageResponse { image_url }))
}

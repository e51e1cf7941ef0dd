use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{MealPlanResponse, PersistedPlan, PlanRequest};
use super::services;
use crate::{error::ApiError, state::AppState};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plan", post(create_meal_plan))
        .route("/meal-plan/:user_id", get(get_meal_plan))
}

#[instrument(skip(state, payload))]
pub async fn create_meal_plan(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<PersistedPlan>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "meal plan request rejected");
        ApiError::bad_request("Invalid meal plan request").with_details(e.body_text())
    })?;

    let (user_id, profile) = payload.validate().map_err(|details| {
        warn!(%details, "meal plan request out of range");
        ApiError::bad_request("Invalid meal plan request").with_details(details)
    })?;

    info!(
        %user_id,
        diet_type = profile.diet_type.as_str(),
        fitness_goal = profile.fitness_goal.as_str(),
        region = %profile.region,
        "generating meal plan"
    );

    match services::generate_meal_plan(&state, user_id, profile).await {
        Ok(saved) => Ok(Json(saved)),
        Err(e) => {
            error!(error = %e, %user_id, "meal plan persistence failed");
            Err(ApiError::internal("Cannot generate meal plan").with_details(format!("{:#}", e)))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_meal_plan(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| {
        ApiError::bad_request("Invalid user id").with_details(e.body_text())
    })?;

    match services::get_meal_plan(&state, user_id).await {
        Ok(Some(meal_plan)) => Ok(Json(MealPlanResponse { meal_plan })),
        Ok(None) => Err(ApiError::not_found("No meal plan found for this user")),
        Err(e) => {
            error!(error = %e, %user_id, "get meal plan failed");
            Err(ApiError::internal("Cannot fetch meal plan"))
        }
    }
}

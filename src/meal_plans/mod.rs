pub mod dto;
pub mod fallback;
pub mod handlers;
pub mod model;
mod prompt;
mod reconcile;
pub mod repo;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::meal_plan_routes())
}

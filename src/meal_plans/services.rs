use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dto::{PersistedPlan, PlanProfile};
use super::fallback::fallback;
use super::model::{WeekPlan, Weekday};
use super::prompt::build_week_prompt;
use super::reconcile::reconcile;
use crate::generation::{parser, GenerationError, RetryPolicy};
use crate::state::AppState;

/// Generates, reconciles and stores a week for `user_id`.
///
/// Generation trouble never fails the call: the fallback template fills
/// whatever the backend did not deliver. Only the store write can fail.
pub async fn generate_meal_plan(
    state: &AppState,
    user_id: Uuid,
    profile: PlanProfile,
) -> anyhow::Result<PersistedPlan> {
    let plan = build_week(state, user_id, &profile).await;
    let saved = state.plans.upsert(user_id, &plan, &profile).await?;
    info!(%user_id, "meal plan saved");
    Ok(saved)
}

async fn build_week(state: &AppState, user_id: Uuid, profile: &PlanProfile) -> WeekPlan {
    let template = fallback(profile.diet_type, &profile.region, profile.fitness_goal);

    let candidate = match request_week(state, profile).await {
        Ok(value) => Some(value),
        Err(GenerationError::Malformed {
            reason,
            raw,
            candidate,
        }) => {
            warn!(
                %user_id,
                %reason,
                raw_len = raw.len(),
                candidate_len = ?candidate.as_ref().map(String::len),
                "generated meal plan is not valid JSON; using fallback template"
            );
            None
        }
        Err(e) => {
            warn!(%user_id, kind = e.kind(), error = %e, "meal plan generation failed; using fallback template");
            None
        }
    };

    let plan = reconcile(candidate.as_ref(), &template);
    debug!(
        %user_id,
        daily_kcal = ?Weekday::ALL.map(|d| plan.day(d).total_calories()),
        "meal plan assembled"
    );
    plan
}

async fn request_week(
    state: &AppState,
    profile: &PlanProfile,
) -> Result<serde_json::Value, GenerationError> {
    let prompt = build_week_prompt(
        profile.diet_type,
        profile.fitness_goal,
        &profile.region,
        &profile.allergies,
    );
    let cancel = CancellationToken::new();
    let raw = state
        .generator
        .generate_with_retry(
            &prompt,
            state.config.generation.meal_plan_timeout,
            RetryPolicy::single(),
            &cancel,
        )
        .await?;
    parser::parse(&raw)
}

pub async fn get_meal_plan(
    state: &AppState,
    user_id: Uuid,
) -> anyhow::Result<Option<PersistedPlan>> {
    state.plans.get_by_user_id(user_id).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::generation::testing::ScriptedBackend;
    use crate::meal_plans::model::{DietType, FitnessGoal};
    use crate::meal_plans::repo::memory::InMemoryPlanStore;

    fn profile() -> PlanProfile {
        PlanProfile {
            diet_type: DietType::Vegetarian,
            fitness_goal: FitnessGoal::WeightLoss,
            region: "indian".into(),
            allergies: vec!["peanuts".into()],
            target_weight: 60.0,
            current_weight: 68.0,
            height: 165.0,
        }
    }

    fn expected_fallback() -> WeekPlan {
        fallback(DietType::Vegetarian, "indian", FitnessGoal::WeightLoss).into()
    }

    #[tokio::test]
    async fn timeout_falls_back_and_persists() {
        let store = Arc::new(InMemoryPlanStore::default());
        let state = AppState::fake(Arc::new(ScriptedBackend::hanging()), store.clone());
        let user = Uuid::new_v4();

        let saved = generate_meal_plan(&state, user, profile()).await.unwrap();
        assert_eq!(saved.plan, expected_fallback());
        assert_eq!(saved.user_id, user);

        let stored = get_meal_plan(&state, user).await.unwrap().unwrap();
        assert_eq!(stored.plan, expected_fallback());
    }

    #[tokio::test]
    async fn unavailable_backend_falls_back() {
        let state = AppState::fake(
            Arc::new(ScriptedBackend::failing()),
            Arc::new(InMemoryPlanStore::default()),
        );
        let saved = generate_meal_plan(&state, Uuid::new_v4(), profile()).await.unwrap();
        assert_eq!(saved.plan, expected_fallback());
    }

    #[tokio::test]
    async fn malformed_text_falls_back() {
        let state = AppState::fake(
            Arc::new(ScriptedBackend::text("Sorry, I can't produce a plan today.")),
            Arc::new(InMemoryPlanStore::default()),
        );
        let saved = generate_meal_plan(&state, Uuid::new_v4(), profile()).await.unwrap();
        assert_eq!(saved.plan, expected_fallback());
    }

    #[tokio::test]
    async fn partial_generation_is_merged_with_fallback() {
        let reply = format!(
            "Here you go!\n```json\n{}\n```",
            json!({
                "monday": {
                    "breakfast": {"name": "Besan chilla", "calories": 280},
                    "lunch": {"name": "Moong dal khichdi", "calories": 420},
                    "dinner": {"name": "Tofu bhurji with roti", "calories": 450},
                    "snacks": {"name": "Buttermilk", "calories": 90}
                }
            })
        );
        let state = AppState::fake(
            Arc::new(ScriptedBackend::text(&reply)),
            Arc::new(InMemoryPlanStore::default()),
        );
        let saved = generate_meal_plan(&state, Uuid::new_v4(), profile()).await.unwrap();

        let monday = serde_json::to_value(&saved.plan.monday).unwrap();
        assert_eq!(monday["breakfast"]["name"], "Besan chilla");
        assert_eq!(monday["snacks"]["calories"], 90);
        let fb = expected_fallback();
        for day in Weekday::ALL.into_iter().skip(1) {
            assert_eq!(saved.plan.day(day), fb.day(day));
        }
    }

    #[tokio::test]
    async fn incomplete_generated_day_is_stored_as_generated() {
        let thursday = json!({
            "breakfast": {"name": "Upma", "calories": "350 kcal"},
            "dinner": {"name": "Rajma chawal", "calories": 512.5}
        });
        let reply = json!({ "thursday": thursday.clone() }).to_string();
        let state = AppState::fake(
            Arc::new(ScriptedBackend::text(&reply)),
            Arc::new(InMemoryPlanStore::default()),
        );
        let user = Uuid::new_v4();
        generate_meal_plan(&state, user, profile()).await.unwrap();

        let stored = get_meal_plan(&state, user).await.unwrap().unwrap();
        assert_eq!(serde_json::to_value(&stored.plan.thursday).unwrap(), thursday);
        assert_eq!(stored.plan.wednesday, expected_fallback().wednesday);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(InMemoryPlanStore::failing_writes());
        let state = AppState::fake(Arc::new(ScriptedBackend::failing()), store);
        let err = generate_meal_plan(&state, Uuid::new_v4(), profile())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn regenerating_overwrites_previous_plan() {
        let store = Arc::new(InMemoryPlanStore::default());
        let state = AppState::fake(Arc::new(ScriptedBackend::failing()), store.clone());
        let user = Uuid::new_v4();

        generate_meal_plan(&state, user, profile()).await.unwrap();
        let mut gain = profile();
        gain.fitness_goal = FitnessGoal::MuscleGain;
        generate_meal_plan(&state, user, gain).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = get_meal_plan(&state, user).await.unwrap().unwrap();
        assert_eq!(stored.profile.fitness_goal, FitnessGoal::MuscleGain);
        assert_eq!(
            stored.plan,
            WeekPlan::from(fallback(DietType::Vegetarian, "indian", FitnessGoal::MuscleGain))
        );
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::fallback::DEFAULT_REGION;
use super::model::{DietType, FitnessGoal, WeekPlan};

const WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 30.0..=200.0;
const HEIGHT_RANGE: std::ops::RangeInclusive<f64> = 100.0..=250.0;

/// Body of `POST /meal-plan`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub diet_type: DietType,
    #[serde(default)]
    pub fitness_goal: FitnessGoal,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    pub target_weight: f64,
    pub current_weight: f64,
    pub height: f64,
}

/// Request fields stored next to the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProfile {
    pub diet_type: DietType,
    pub fitness_goal: FitnessGoal,
    pub region: String,
    pub allergies: Vec<String>,
    pub target_weight: f64,
    pub current_weight: f64,
    pub height: f64,
}

impl PlanRequest {
    /// Checks domain bounds and normalises free-text fields.
    pub fn validate(self) -> Result<(Uuid, PlanProfile), String> {
        check_range("currentWeight", self.current_weight, &WEIGHT_RANGE)?;
        check_range("targetWeight", self.target_weight, &WEIGHT_RANGE)?;
        check_range("height", self.height, &HEIGHT_RANGE)?;

        let region = self
            .region
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let allergies = self
            .allergies
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Ok((
            self.user_id,
            PlanProfile {
                diet_type: self.diet_type,
                fitness_goal: self.fitness_goal,
                region,
                allergies,
                target_weight: self.target_weight,
                current_weight: self.current_weight,
                height: self.height,
            },
        ))
    }
}

fn check_range(
    field: &str,
    value: f64,
    range: &std::ops::RangeInclusive<f64>,
) -> Result<(), String> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {}",
            field,
            range.start(),
            range.end()
        ))
    }
}

/// The stored plan, one per user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPlan {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub profile: PlanProfile,
    #[serde(flatten)]
    pub plan: WeekPlan,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub meal_plan: PersistedPlan,
}

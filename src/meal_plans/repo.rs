use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{PersistedPlan, PlanProfile};
use super::model::{PlannedDay, WeekPlan};

/// One plan per user; writing again replaces the previous plan.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn upsert(
        &self,
        user_id: Uuid,
        plan: &WeekPlan,
        profile: &PlanProfile,
    ) -> anyhow::Result<PersistedPlan>;

    async fn get_by_user_id(&self, user_id: Uuid) -> anyhow::Result<Option<PersistedPlan>>;
}

#[derive(Debug, FromRow)]
struct MealPlanRow {
    user_id: Uuid,
    diet_type: String,
    fitness_goal: String,
    region: String,
    allergies: Vec<String>,
    target_weight: f64,
    current_weight: f64,
    height: f64,
    monday: Json<PlannedDay>,
    tuesday: Json<PlannedDay>,
    wednesday: Json<PlannedDay>,
    thursday: Json<PlannedDay>,
    friday: Json<PlannedDay>,
    saturday: Json<PlannedDay>,
    sunday: Json<PlannedDay>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<MealPlanRow> for PersistedPlan {
    type Error = anyhow::Error;

    fn try_from(r: MealPlanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: r.user_id,
            profile: PlanProfile {
                diet_type: r.diet_type.parse().map_err(anyhow::Error::msg)?,
                fitness_goal: r.fitness_goal.parse().map_err(anyhow::Error::msg)?,
                region: r.region,
                allergies: r.allergies,
                target_weight: r.target_weight,
                current_weight: r.current_weight,
                height: r.height,
            },
            plan: WeekPlan {
                monday: r.monday.0,
                tuesday: r.tuesday.0,
                wednesday: r.wednesday.0,
                thursday: r.thursday.0,
                friday: r.friday.0,
                saturday: r.saturday.0,
                sunday: r.sunday.0,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const COLUMNS: &str = "user_id, diet_type, fitness_goal, region, allergies, \
     target_weight, current_weight, height, \
     monday, tuesday, wednesday, thursday, friday, saturday, sunday, \
     created_at, updated_at";

#[derive(Clone)]
pub struct PgPlanStore {
    db: PgPool,
}

impl PgPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn upsert(
        &self,
        user_id: Uuid,
        plan: &WeekPlan,
        profile: &PlanProfile,
    ) -> anyhow::Result<PersistedPlan> {
        let sql = format!(
            r#"
            INSERT INTO meal_plans (
                user_id, diet_type, fitness_goal, region, allergies,
                target_weight, current_weight, height,
                monday, tuesday, wednesday, thursday, friday, saturday, sunday
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (user_id) DO UPDATE SET
                diet_type = EXCLUDED.diet_type,
                fitness_goal = EXCLUDED.fitness_goal,
                region = EXCLUDED.region,
                allergies = EXCLUDED.allergies,
                target_weight = EXCLUDED.target_weight,
                current_weight = EXCLUDED.current_weight,
                height = EXCLUDED.height,
                monday = EXCLUDED.monday,
                tuesday = EXCLUDED.tuesday,
                wednesday = EXCLUDED.wednesday,
                thursday = EXCLUDED.thursday,
                friday = EXCLUDED.friday,
                saturday = EXCLUDED.saturday,
                sunday = EXCLUDED.sunday,
                updated_at = now()
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, MealPlanRow>(&sql)
            .bind(user_id)
            .bind(profile.diet_type.as_str())
            .bind(profile.fitness_goal.as_str())
            .bind(&profile.region)
            .bind(&profile.allergies)
            .bind(profile.target_weight)
            .bind(profile.current_weight)
            .bind(profile.height)
            .bind(Json(&plan.monday))
            .bind(Json(&plan.tuesday))
            .bind(Json(&plan.wednesday))
            .bind(Json(&plan.thursday))
            .bind(Json(&plan.friday))
            .bind(Json(&plan.saturday))
            .bind(Json(&plan.sunday))
            .fetch_one(&self.db)
            .await
            .context("upsert meal plan")?;
        row.try_into()
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> anyhow::Result<Option<PersistedPlan>> {
        let sql = format!("SELECT {COLUMNS} FROM meal_plans WHERE user_id = $1");
        let row = sqlx::query_as::<_, MealPlanRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("get meal plan by user")?;
        row.map(PersistedPlan::try_from).transpose()
    }
}

use serde_json::Value;
use tracing::{debug, warn};

use super::model::{DayPlan, PlannedDay, WeekPlan, Weekday};

/// Merges a generated (possibly partial) plan with a fallback week.
///
/// A candidate day that is a non-empty object is kept exactly as
/// generated, with no per-slot checks; any other day takes the fallback's
/// day. The result always has all seven days.
pub fn reconcile(candidate: Option<&Value>, fallback: &WeekPlan<DayPlan>) -> WeekPlan {
    let days = candidate.and_then(Value::as_object);
    if candidate.is_some() && days.is_none() {
        warn!("generated payload is not an object; using fallback week");
    }

    let mut substituted = Vec::new();
    let plan = WeekPlan::from_fn(|day| {
        let generated = days
            .and_then(|d| d.get(day.key()))
            .and_then(Value::as_object)
            .filter(|o| !o.is_empty());
        match generated {
            Some(obj) => PlannedDay::Verbatim(obj.clone()),
            None => {
                substituted.push(day.key());
                PlannedDay::Structured(fallback.day(day).clone())
            }
        }
    });

    // Kept as generated; logged so incomplete days are visible.
    for day in Weekday::ALL {
        let missing = plan.day(day).missing_slots();
        if !missing.is_empty() {
            warn!(%day, ?missing, "generated day kept without all meal slots");
        }
    }

    debug!(substituted = ?substituted, "plan reconciled");
    plan
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::meal_plans::fallback::fallback;
    use crate::meal_plans::model::{DietType, FitnessGoal, MealSlot};

    fn fb() -> WeekPlan<DayPlan> {
        fallback(DietType::Vegetarian, "indian", FitnessGoal::WeightLoss)
    }

    fn fb_week() -> WeekPlan {
        fb().into()
    }

    fn generated_day(tag: &str) -> Value {
        json!({
            "breakfast": {"name": format!("{tag} breakfast"), "calories": 310},
            "lunch": {"name": format!("{tag} lunch"), "calories": 510},
            "dinner": {"name": format!("{tag} dinner"), "calories": 560},
            "snacks": {"name": format!("{tag} snacks"), "calories": 140}
        })
    }

    fn day_json(plan: &WeekPlan, day: Weekday) -> Value {
        serde_json::to_value(plan.day(day)).unwrap()
    }

    #[test]
    fn none_candidate_yields_fallback() {
        assert_eq!(reconcile(None, &fb()), fb_week());
    }

    #[test]
    fn only_monday_generated() {
        let candidate = json!({ "monday": generated_day("gen") });
        let out = reconcile(Some(&candidate), &fb());

        assert_eq!(day_json(&out, Weekday::Monday), generated_day("gen"));
        for day in Weekday::ALL.into_iter().skip(1) {
            assert_eq!(out.day(day), fb_week().day(day), "{day}");
        }
    }

    #[test]
    fn full_candidate_kept_verbatim() {
        let mut obj = serde_json::Map::new();
        for day in Weekday::ALL {
            obj.insert(day.key().to_string(), generated_day(day.key()));
        }
        let out = reconcile(Some(&Value::Object(obj)), &fb());
        assert_eq!(day_json(&out, Weekday::Friday)["dinner"]["name"], "friday dinner");
        assert_eq!(day_json(&out, Weekday::Sunday)["snacks"]["calories"], 140);
    }

    #[test]
    fn empty_or_non_object_days_are_replaced() {
        let candidate = json!({
            "monday": {},
            "tuesday": null,
            "wednesday": "pasta",
            "thursday": [1, 2]
        });
        assert_eq!(reconcile(Some(&candidate), &fb()), fb_week());
    }

    #[test]
    fn present_day_is_kept_even_when_incomplete() {
        let partial = json!({
            "breakfast": {"name": "Oats", "calories": 300},
            "lunch": {"name": "Soup", "calories": 400}
        });
        let out = reconcile(Some(&json!({ "monday": partial.clone() })), &fb());
        assert_eq!(day_json(&out, Weekday::Monday), partial);
        assert_eq!(out.monday.missing_slots(), vec!["dinner", "snacks"]);
    }

    #[test]
    fn present_day_is_kept_with_odd_values() {
        let odd = json!({
            "breakfast": {"name": "Oats", "calories": 299.6},
            "lunch": {"name": "Soup", "calories": "400 kcal"},
            "dinner": {"name": "Curry", "calories": 500},
            "snacks": {"name": "Nuts", "calories": 150},
            "dessert": {"name": "Kheer", "calories": 250}
        });
        let out = reconcile(Some(&json!({ "tuesday": odd.clone() })), &fb());
        assert_eq!(day_json(&out, Weekday::Tuesday), odd);
        assert_eq!(out.monday, fb_week().monday);
    }

    #[test]
    fn non_object_payload_yields_fallback() {
        assert_eq!(reconcile(Some(&json!([1, 2, 3])), &fb()), fb_week());
    }

    #[test]
    fn unknown_day_keys_are_ignored() {
        let candidate = json!({ "Monday": generated_day("caps"), "funday": generated_day("x") });
        assert_eq!(reconcile(Some(&candidate), &fb()), fb_week());
    }

    #[test]
    fn output_always_has_seven_days() {
        let candidate = json!({ "wednesday": generated_day("mid") });
        let out = serde_json::to_value(reconcile(Some(&candidate), &fb())).unwrap();
        let days = out.as_object().unwrap();
        assert_eq!(days.len(), 7);
        for day in Weekday::ALL {
            let slots = days[day.key()].as_object().unwrap();
            for slot in MealSlot::ALL {
                assert!(slots.contains_key(slot.key()), "{day} {}", slot.key());
            }
        }
    }
}

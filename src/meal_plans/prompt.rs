use std::fmt::Write;

use super::model::{DietType, FitnessGoal, MealSlot, Weekday};

/// Placeholder meal shown for each slot in the requested shape.
const SLOT_EXAMPLES: [(MealSlot, &str, u32); 4] = [
    (MealSlot::Breakfast, "dish name", 300),
    (MealSlot::Lunch, "dish name", 500),
    (MealSlot::Dinner, "dish name", 550),
    (MealSlot::Snacks, "snack name", 150),
];

pub fn daily_calorie_target(goal: FitnessGoal) -> u32 {
    match goal {
        FitnessGoal::WeightLoss => 1600,
        FitnessGoal::WeightGain => 2400,
        FitnessGoal::MuscleGain => 2600,
        FitnessGoal::Maintenance | FitnessGoal::GeneralFitness => 2000,
    }
}

/// Instruction asking for the whole week as bare JSON in one reply.
pub fn build_week_prompt(
    diet: DietType,
    goal: FitnessGoal,
    region: &str,
    allergies: &[String],
) -> String {
    let allergies = if allergies.is_empty() {
        "none".to_string()
    } else {
        allergies.join(", ")
    };

    let mut prompt = format!(
        "Generate a complete 7-day meal plan.\n\n\
         Diet: {}\n\
         Goal: {}\n\
         Cuisine: {}\n\
         Allergies: {}\n\
         Daily Calorie Target: {} kcal\n\n\
         IMPORTANT: Return ONLY valid JSON. No explanations, no markdown.\n\n\
         Format:\n",
        diet.as_str(),
        goal.as_str(),
        region,
        allergies,
        daily_calorie_target(goal),
    );
    prompt.push_str(&week_shape());
    prompt.push_str("\n\nJSON:");
    prompt
}

fn week_shape() -> String {
    let mut out = String::from("{\n");
    for (i, day) in Weekday::ALL.iter().enumerate() {
        let _ = writeln!(out, "  \"{}\": {{", day.key());
        for (j, (slot, name, calories)) in SLOT_EXAMPLES.iter().enumerate() {
            let sep = if j + 1 < SLOT_EXAMPLES.len() { "," } else { "" };
            let _ = writeln!(
                out,
                "    \"{}\": {{\"name\": \"{}\", \"calories\": {}}}{}",
                slot.key(),
                name,
                calories,
                sep
            );
        }
        let sep = if i + 1 < Weekday::ALL.len() { "," } else { "" };
        let _ = writeln!(out, "  }}{}", sep);
    }
    out.push('}');
    out
}

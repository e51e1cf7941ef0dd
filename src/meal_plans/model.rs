use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    #[default]
    Regular,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
}

impl DietType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
        }
    }
}

impl FromStr for DietType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            "keto" => Ok(Self::Keto),
            "paleo" => Ok(Self::Paleo),
            other => Err(format!("unknown diet type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    WeightGain,
    MuscleGain,
    #[default]
    Maintenance,
    GeneralFitness,
}

impl FitnessGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::WeightGain => "weight_gain",
            Self::MuscleGain => "muscle_gain",
            Self::Maintenance => "maintenance",
            Self::GeneralFitness => "general_fitness",
        }
    }
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight_loss" => Ok(Self::WeightLoss),
            "weight_gain" => Ok(Self::WeightGain),
            "muscle_gain" => Ok(Self::MuscleGain),
            "maintenance" => Ok(Self::Maintenance),
            "general_fitness" => Ok(Self::GeneralFitness),
            other => Err(format!("unknown fitness goal: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snacks];

    pub fn key(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealEntry {
    pub name: String,
    pub calories: u32,
}

/// A day with exactly the four meal slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DayPlan {
    pub breakfast: MealEntry,
    pub lunch: MealEntry,
    pub dinner: MealEntry,
    pub snacks: MealEntry,
}

impl DayPlan {
    pub fn meal(&self, slot: MealSlot) -> &MealEntry {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    pub fn total_calories(&self) -> u32 {
        MealSlot::ALL.iter().map(|s| self.meal(*s).calories).sum()
    }
}

/// One day of a stored plan.
///
/// Generated days are stored exactly as the backend produced them, so a
/// generated day may lack slots or carry odd calorie values. Decoding tries
/// the four-slot shape first; anything else stays a raw object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlannedDay {
    Structured(DayPlan),
    Verbatim(Map<String, Value>),
}

impl PlannedDay {
    /// Total calories, known only for four-slot days.
    pub fn total_calories(&self) -> Option<u32> {
        match self {
            Self::Structured(day) => Some(day.total_calories()),
            Self::Verbatim(_) => None,
        }
    }

    /// Slot keys missing from the day.
    pub fn missing_slots(&self) -> Vec<&'static str> {
        match self {
            Self::Structured(_) => Vec::new(),
            Self::Verbatim(obj) => MealSlot::ALL
                .iter()
                .map(|s| s.key())
                .filter(|k| !obj.contains_key(*k))
                .collect(),
        }
    }
}

impl From<DayPlan> for PlannedDay {
    fn from(day: DayPlan) -> Self {
        Self::Structured(day)
    }
}

/// A full week; every day is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan<D = PlannedDay> {
    pub monday: D,
    pub tuesday: D,
    pub wednesday: D,
    pub thursday: D,
    pub friday: D,
    pub saturday: D,
    pub sunday: D,
}

impl<D> WeekPlan<D> {
    pub fn from_fn(mut f: impl FnMut(Weekday) -> D) -> Self {
        Self {
            monday: f(Weekday::Monday),
            tuesday: f(Weekday::Tuesday),
            wednesday: f(Weekday::Wednesday),
            thursday: f(Weekday::Thursday),
            friday: f(Weekday::Friday),
            saturday: f(Weekday::Saturday),
            sunday: f(Weekday::Sunday),
        }
    }

    pub fn day(&self, day: Weekday) -> &D {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }
}

impl From<WeekPlan<DayPlan>> for WeekPlan {
    fn from(week: WeekPlan<DayPlan>) -> Self {
        Self {
            monday: week.monday.into(),
            tuesday: week.tuesday.into(),
            wednesday: week.wednesday.into(),
            thursday: week.thursday.into(),
            friday: week.friday.into(),
            saturday: week.saturday.into(),
            sunday: week.sunday.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn enums_use_snake_case_wire_names() {
        assert_eq!(serde_json::to_value(FitnessGoal::MuscleGain).unwrap(), json!("muscle_gain"));
        assert_eq!("general_fitness".parse::<FitnessGoal>().unwrap(), FitnessGoal::GeneralFitness);
        assert_eq!("keto".parse::<DietType>().unwrap().as_str(), "keto");
        assert!("carnivore".parse::<DietType>().is_err());
    }

    #[test]
    fn weekday_keys_are_fixed_lowercase_names() {
        let keys: Vec<_> = Weekday::ALL.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
        );
        assert_eq!(Weekday::Sunday.index(), 6);
    }

    fn full_day() -> Value {
        json!({
            "breakfast": {"name": "Oats", "calories": 300},
            "lunch": {"name": "Soup", "calories": 400},
            "dinner": {"name": "Curry", "calories": 500},
            "snacks": {"name": "Nuts", "calories": 150}
        })
    }

    #[test]
    fn four_slot_day_decodes_structured() {
        let day: PlannedDay = serde_json::from_value(full_day()).unwrap();
        assert_eq!(day.total_calories(), Some(1350));
        assert!(day.missing_slots().is_empty());
    }

    #[test]
    fn irregular_days_decode_verbatim() {
        let partial = json!({
            "breakfast": {"name": "Oats", "calories": 299.6},
            "lunch": {"name": "Soup", "calories": "400 kcal"}
        });
        let day: PlannedDay = serde_json::from_value(partial.clone()).unwrap();
        assert!(matches!(day, PlannedDay::Verbatim(_)));
        assert_eq!(day.total_calories(), None);
        assert_eq!(day.missing_slots(), vec!["dinner", "snacks"]);
        assert_eq!(serde_json::to_value(&day).unwrap(), partial);

        let mut extra = full_day();
        extra["dessert"] = json!({"name": "Cake", "calories": 450});
        let day: PlannedDay = serde_json::from_value(extra.clone()).unwrap();
        assert_eq!(serde_json::to_value(&day).unwrap(), extra);
    }

    #[test]
    fn day_plan_is_strict() {
        assert!(serde_json::from_value::<DayPlan>(json!({
            "breakfast": {"name": "Oats", "calories": 300}
        }))
        .is_err());
        let mut negative = full_day();
        negative["snacks"]["calories"] = json!(-5);
        assert!(serde_json::from_value::<DayPlan>(negative).is_err());
    }
}

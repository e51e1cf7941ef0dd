//! Offline weekly meal templates used whenever generation fails.
//!
//! Templates are keyed by (diet, region). A diet without its own set uses
//! the regular set; a region missing from a set uses that set's default
//! (Indian) week.

use super::model::{DayPlan, DietType, FitnessGoal, MealEntry, WeekPlan, Weekday};

pub const DEFAULT_REGION: &str = "indian";

#[derive(Debug)]
struct TemplateMeal {
    name: &'static str,
    calories: u32,
}

/// breakfast, lunch, dinner, snacks
type DayTemplate = [TemplateMeal; 4];
/// monday through sunday
type WeekTemplate = [DayTemplate; 7];

struct TemplateSet {
    default: &'static WeekTemplate,
    regions: &'static [(&'static str, &'static WeekTemplate)],
}

const fn m(name: &'static str, calories: u32) -> TemplateMeal {
    TemplateMeal { name, calories }
}

static VEGETARIAN_INDIAN: WeekTemplate = [
    [
        m("Poha with vegetables and peanuts", 300),
        m("Dal tadka with jeera rice", 450),
        m("Paneer butter masala with roti", 500),
        m("Fruit salad with chat masala", 120),
    ],
    [
        m("Idli sambar with coconut chutney", 280),
        m("Chole with brown rice", 480),
        m("Mixed vegetable curry with chapati", 450),
        m("Roasted makhana", 100),
    ],
    [
        m("Upma with vegetables", 290),
        m("Rajma curry with rice", 500),
        m("Palak paneer with roti", 480),
        m("Sprouted moong salad", 130),
    ],
    [
        m("Methi thepla with curd", 310),
        m("Kadhi pakora with rice", 470),
        m("Aloo gobi with chapati", 440),
        m("Masala peanuts", 150),
    ],
    [
        m("Dosa with sambar", 300),
        m("Paneer tikka masala with naan", 520),
        m("Vegetable biryani", 550),
        m("Mixed fruit bowl", 110),
    ],
    [
        m("Paratha with potato stuffing", 350),
        m("Malai kofta with rice", 540),
        m("Dal makhani with roti", 490),
        m("Roasted chana", 120),
    ],
    [
        m("Puri bhaji", 380),
        m("Paneer pulao with raita", 510),
        m("Mixed dal with jeera rice", 460),
        m("Vegetable pakora", 160),
    ],
];

static VEGETARIAN_ITALIAN: WeekTemplate = [
    [
        m("Avocado toast with tomatoes", 300),
        m("Margherita pizza", 480),
        m("Pasta primavera", 500),
        m("Caprese salad", 140),
    ],
    [
        m("Bruschetta with olive oil", 280),
        m("Vegetable lasagna", 520),
        m("Penne arrabbiata", 460),
        m("Mixed olives and nuts", 150),
    ],
    [
        m("Italian focaccia with herbs", 310),
        m("Eggplant parmigiana", 500),
        m("Mushroom risotto", 480),
        m("Fresh mozzarella", 130),
    ],
    [
        m("Tomato basil omelet", 290),
        m("Vegetable minestrone soup", 350),
        m("Spinach ravioli", 510),
        m("Grissini breadsticks", 120),
    ],
    [
        m("Panini with vegetables", 320),
        m("Quattro formaggi pizza", 550),
        m("Fettuccine alfredo", 580),
        m("Bruschetta", 140),
    ],
    [
        m("Italian frittata", 300),
        m("Pesto pasta with pine nuts", 530),
        m("Vegetable pizza", 490),
        m("Tiramisu (small)", 200),
    ],
    [
        m("Cannoli for brunch", 350),
        m("Gnocchi with tomato sauce", 480),
        m("Vegetable calzone", 520),
        m("Gelato", 180),
    ],
];

static REGULAR_INDIAN: WeekTemplate = [
    [
        m("Egg paratha with curd", 350),
        m("Chicken curry with rice", 550),
        m("Dal and roti with salad", 450),
        m("Samosa", 200),
    ],
    [
        m("Masala dosa with chutney", 320),
        m("Butter chicken with naan", 600),
        m("Fish curry with rice", 520),
        m("Bhel puri", 180),
    ],
    [
        m("Aloo paratha with pickle", 360),
        m("Mutton biryani", 620),
        m("Paneer tikka with roti", 480),
        m("Vada pav", 210),
    ],
    [
        m("Poha with boiled egg", 330),
        m("Chicken biryani", 580),
        m("Dal makhani with rice", 490),
        m("Kachori", 220),
    ],
    [
        m("Upma with egg bhurji", 340),
        m("Fish fry with rice", 560),
        m("Chicken korma with roti", 530),
        m("Pakora", 190),
    ],
    [
        m("Puri bhaji with aloo", 380),
        m("Lamb curry with naan", 640),
        m("Egg curry with rice", 500),
        m("Spring rolls", 200),
    ],
    [
        m("Chole bhature", 400),
        m("Chicken tandoori with rice", 590),
        m("Mixed dal with chapati", 460),
        m("Paneer tikka", 210),
    ],
];

static VEGETARIAN: TemplateSet = TemplateSet {
    default: &VEGETARIAN_INDIAN,
    regions: &[("indian", &VEGETARIAN_INDIAN), ("italian", &VEGETARIAN_ITALIAN)],
};

static REGULAR: TemplateSet = TemplateSet {
    default: &REGULAR_INDIAN,
    regions: &[("indian", &REGULAR_INDIAN)],
};

fn template_set(diet: DietType) -> &'static TemplateSet {
    match diet {
        DietType::Vegetarian => &VEGETARIAN,
        DietType::Regular | DietType::Vegan | DietType::Keto | DietType::Paleo => &REGULAR,
    }
}

fn select(diet: DietType, region: &str) -> &'static WeekTemplate {
    let set = template_set(diet);
    set.regions
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(region.trim()))
        .map(|(_, week)| *week)
        .unwrap_or(set.default)
}

pub fn goal_multiplier(goal: FitnessGoal) -> f64 {
    match goal {
        FitnessGoal::WeightLoss => 0.85,
        FitnessGoal::WeightGain | FitnessGoal::MuscleGain => 1.15,
        FitnessGoal::Maintenance | FitnessGoal::GeneralFitness => 1.0,
    }
}

pub fn scale_calories(calories: u32, goal: FitnessGoal) -> u32 {
    (calories as f64 * goal_multiplier(goal)).round() as u32
}

/// A complete week for the given preferences. Pure and deterministic.
pub fn fallback(diet: DietType, region: &str, goal: FitnessGoal) -> WeekPlan<DayPlan> {
    let week = select(diet, region);
    WeekPlan::from_fn(|day| {
        let [breakfast, lunch, dinner, snacks] = &week[day.index()];
        let entry = |t: &TemplateMeal| MealEntry {
            name: t.name.to_string(),
            calories: scale_calories(t.calories, goal),
        };
        DayPlan {
            breakfast: entry(breakfast),
            lunch: entry(lunch),
            dinner: entry(dinner),
            snacks: entry(snacks),
        }
    })
}

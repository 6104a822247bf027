//! Total daily energy expenditure: BMR times an activity multiplier, with
//! goal calories and a macronutrient split.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

const KG_PER_LB: Decimal = dec!(0.45359237);
const CM_PER_IN: Decimal = dec!(2.54);

const KCAL_PER_G_PROTEIN: Decimal = dec!(4);
const KCAL_PER_G_CARB: Decimal = dec!(4);
const KCAL_PER_G_FAT: Decimal = dec!(9);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    /// Pounds and inches.
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> Decimal {
        match self {
            ActivityLevel::Sedentary => dec!(1.2),
            ActivityLevel::Light => dec!(1.375),
            ActivityLevel::Moderate => dec!(1.55),
            ActivityLevel::Active => dec!(1.725),
            ActivityLevel::VeryActive => dec!(1.9),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Lose,
    MildLose,
    #[default]
    Maintain,
    MildGain,
    Gain,
}

impl Goal {
    fn calorie_adjustment(self) -> Decimal {
        match self {
            Goal::Lose => dec!(-500),
            Goal::MildLose => dec!(-250),
            Goal::Maintain => Decimal::ZERO,
            Goal::MildGain => dec!(250),
            Goal::Gain => dec!(500),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdeeInput {
    pub sex: Sex,
    pub age: u32,
    /// Kilograms (metric) or pounds (imperial).
    pub weight: Decimal,
    /// Centimetres (metric) or inches (imperial).
    pub height: Decimal,
    #[serde(default)]
    pub units: UnitSystem,
    pub activity: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    /// Body-fat fraction (0.18 = 18%). Switches BMR to Katch-McArdle.
    #[serde(default)]
    pub body_fat_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: Decimal,
    pub fat_g: Decimal,
    pub carbs_g: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdeeOutput {
    pub bmr: Decimal,
    pub tdee: Decimal,
    pub goal_calories: Decimal,
    pub activity_multiplier: Decimal,
    pub bmi: Decimal,
    pub macros: Macros,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_tdee(input: &TdeeInput) -> CalcResult<ComputationOutput<TdeeOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if !(15..=100).contains(&input.age) {
        return Err(CalcError::invalid("age", "Age must be between 15 and 100"));
    }
    if input.weight <= Decimal::ZERO {
        return Err(CalcError::invalid("weight", "Weight must be > 0"));
    }
    if input.height <= Decimal::ZERO {
        return Err(CalcError::invalid("height", "Height must be > 0"));
    }

    let (weight_kg, height_cm) = match input.units {
        UnitSystem::Metric => (input.weight, input.height),
        UnitSystem::Imperial => (input.weight * KG_PER_LB, input.height * CM_PER_IN),
    };

    let (bmr, methodology) = match input.body_fat_pct {
        Some(bf) => {
            if bf <= Decimal::ZERO || bf >= dec!(0.7) {
                return Err(CalcError::invalid(
                    "body_fat_pct",
                    "Body-fat fraction must be in (0, 0.7)",
                ));
            }
            let lean_mass = weight_kg * (Decimal::ONE - bf);
            (dec!(370) + dec!(21.6) * lean_mass, "Katch-McArdle BMR x activity multiplier")
        }
        None => {
            let base = dec!(10) * weight_kg + dec!(6.25) * height_cm
                - dec!(5) * Decimal::from(input.age);
            let sex_offset = match input.sex {
                Sex::Male => dec!(5),
                Sex::Female => dec!(-161),
            };
            (base + sex_offset, "Mifflin-St Jeor BMR x activity multiplier")
        }
    };

    let multiplier = input.activity.multiplier();
    let tdee = bmr * multiplier;
    let mut goal_calories = tdee + input.goal.calorie_adjustment();

    let floor = match input.sex {
        Sex::Male => dec!(1500),
        Sex::Female => dec!(1200),
    };
    if goal_calories < floor {
        warnings.push(format!(
            "Goal of {} kcal is below the {} kcal minimum; clamped",
            goal_calories.round(),
            floor
        ));
        goal_calories = floor;
    }

    let height_m = height_cm / dec!(100);
    let bmi = weight_kg / (height_m * height_m);

    // 2 g protein per kg, 25% of calories from fat, remainder carbs.
    let protein_g = (dec!(2) * weight_kg).min(goal_calories * dec!(0.35) / KCAL_PER_G_PROTEIN);
    let fat_g = goal_calories * dec!(0.25) / KCAL_PER_G_FAT;
    let carb_kcal = goal_calories - protein_g * KCAL_PER_G_PROTEIN - fat_g * KCAL_PER_G_FAT;
    let carbs_g = (carb_kcal / KCAL_PER_G_CARB).max(Decimal::ZERO);

    let output = TdeeOutput {
        bmr: bmr.round_dp(1),
        tdee: tdee.round_dp(1),
        goal_calories: goal_calories.round_dp(0),
        activity_multiplier: multiplier,
        bmi: bmi.round_dp(1),
        macros: Macros {
            protein_g: protein_g.round_dp(0),
            fat_g: fat_g.round_dp(0),
            carbs_g: carbs_g.round_dp(0),
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

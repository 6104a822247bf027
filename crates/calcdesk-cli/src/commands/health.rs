use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use calcdesk_core::health::tdee::{self, ActivityLevel, Goal, Sex, TdeeInput, UnitSystem};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActivityArg {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Lose,
    MildLose,
    Maintain,
    MildGain,
    Gain,
}

/// Arguments for TDEE
#[derive(Args)]
pub struct TdeeArgs {
    /// Path to a JSON TDEE input
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub sex: Option<SexArg>,

    #[arg(long)]
    pub age: Option<u32>,

    /// Weight in kg (lb with --imperial)
    #[arg(long)]
    pub weight: Option<Decimal>,

    /// Height in cm (inches with --imperial)
    #[arg(long)]
    pub height: Option<Decimal>,

    /// Read weight and height as pounds and inches
    #[arg(long)]
    pub imperial: bool,

    #[arg(long, value_enum, default_value = "moderate")]
    pub activity: ActivityArg,

    #[arg(long, value_enum, default_value = "maintain")]
    pub goal: GoalArg,

    /// Body-fat fraction (0.18 = 18%); switches to Katch-McArdle
    #[arg(long)]
    pub body_fat: Option<Decimal>,
}

pub fn run_tdee(args: TdeeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tdee_input: TdeeInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => tdee_from_flags(&args)?,
    };
    let result = tdee::calculate_tdee(&tdee_input)?;
    Ok(serde_json::to_value(result)?)
}

fn tdee_from_flags(args: &TdeeArgs) -> Result<TdeeInput, Box<dyn std::error::Error>> {
    let sex = match args.sex.ok_or("--sex is required (or provide --input)")? {
        SexArg::Male => Sex::Male,
        SexArg::Female => Sex::Female,
    };
    let activity = match args.activity {
        ActivityArg::Sedentary => ActivityLevel::Sedentary,
        ActivityArg::Light => ActivityLevel::Light,
        ActivityArg::Moderate => ActivityLevel::Moderate,
        ActivityArg::Active => ActivityLevel::Active,
        ActivityArg::VeryActive => ActivityLevel::VeryActive,
    };
    let goal = match args.goal {
        GoalArg::Lose => Goal::Lose,
        GoalArg::MildLose => Goal::MildLose,
        GoalArg::Maintain => Goal::Maintain,
        GoalArg::MildGain => Goal::MildGain,
        GoalArg::Gain => Goal::Gain,
    };

    Ok(TdeeInput {
        sex,
        age: args.age.ok_or("--age is required (or provide --input)")?,
        weight: args.weight.ok_or("--weight is required (or provide --input)")?,
        height: args.height.ok_or("--height is required (or provide --input)")?,
        units: if args.imperial {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        },
        activity,
        goal,
        body_fat_pct: args.body_fat,
    })
}

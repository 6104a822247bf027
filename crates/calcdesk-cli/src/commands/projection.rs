use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use calcdesk_core::projection::{self, AmortizationInput, Direction, PaymentPolicy};

use crate::input;

/// Arguments for a raw balance projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON projection input
    #[arg(long)]
    pub input: Option<String>,

    /// Starting balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate (0.05 = 5%), divided by 12 for monthly periods
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Number of monthly periods to project
    #[arg(long)]
    pub periods: Option<u32>,

    /// Fixed monthly payment; omit for a level annuity payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Extra amount paid every period
    #[arg(long, default_value = "0")]
    pub extra: Decimal,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let projection_input: AmortizationInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => from_flags(&args)?,
    };

    let result = projection::run_projection(&projection_input)?;
    Ok(serde_json::to_value(result)?)
}

fn from_flags(args: &ProjectArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    Ok(AmortizationInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        periodic_rate: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?
            / dec!(12),
        horizon_periods: args
            .periods
            .ok_or("--periods is required (or provide --input)")?,
        payment: match args.payment {
            Some(amount) => PaymentPolicy::Scheduled { amount },
            None => PaymentPolicy::Annuity,
        },
        extra_recurring: args.extra,
        extra_one_time: None,
        direction: Direction::Amortizing,
    })
}

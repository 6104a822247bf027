use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calcdesk_core::retirement::rmd::{self, AccountType, RmdInput};
use calcdesk_core::retirement::savings::{self, ContributionTiming, SavingsInput};

use crate::input;

/// Arguments for required minimum distributions
#[derive(Args)]
pub struct RmdArgs {
    /// Path to a JSON RMD input
    #[arg(long)]
    pub input: Option<String>,

    /// Prior year-end account balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Owner's (or beneficiary's) birth date, YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,

    /// Distribution year
    #[arg(long)]
    pub year: Option<i32>,

    /// Treat as an inherited account; the original owner died in this year
    #[arg(long)]
    pub inherited_from: Option<i32>,

    /// Expected annual return for the projection
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub expected_return: Decimal,

    /// Years to project
    #[arg(long, default_value = "20")]
    pub projection_years: u32,
}

/// Arguments for savings growth
#[derive(Args)]
pub struct SavingsArgs {
    /// Path to a JSON savings input
    #[arg(long)]
    pub input: Option<String>,

    /// Opening deposit
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Annual interest rate (0.05 = 5%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Compounding periods per year: 1, 2, 4, 12, 52 or 365
    #[arg(long, default_value = "12")]
    pub compounds_per_year: u32,

    /// Years to grow
    #[arg(long)]
    pub years: Option<u32>,

    /// Contribution made every compounding period
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Annual increase in the contribution (0.03 = +3% a year)
    #[arg(long, default_value = "0")]
    pub contribution_growth: Decimal,

    /// Contribute at the start of each period instead of the end
    #[arg(long)]
    pub at_start: bool,
}

pub fn run_rmd(args: RmdArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rmd_input: RmdInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => rmd_from_flags(&args)?,
    };
    let result = rmd::calculate_rmd(&rmd_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_savings(args: SavingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let savings_input: SavingsInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => savings_from_flags(&args)?,
    };
    let result = savings::calculate_savings(&savings_input)?;
    Ok(serde_json::to_value(result)?)
}

fn rmd_from_flags(args: &RmdArgs) -> Result<RmdInput, Box<dyn std::error::Error>> {
    Ok(RmdInput {
        account_balance: args
            .balance
            .ok_or("--balance is required (or provide --input)")?,
        birth_date: args
            .birth_date
            .ok_or("--birth-date is required (or provide --input)")?,
        as_of_year: args.year.ok_or("--year is required (or provide --input)")?,
        account_type: match args.inherited_from {
            Some(year_of_death) => AccountType::Inherited { year_of_death },
            None => AccountType::Ira,
        },
        expected_return: args.expected_return,
        projection_years: args.projection_years,
    })
}

fn savings_from_flags(args: &SavingsArgs) -> Result<SavingsInput, Box<dyn std::error::Error>> {
    Ok(SavingsInput {
        initial_deposit: args.initial,
        annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        compounds_per_year: args.compounds_per_year,
        years: args.years.ok_or("--years is required (or provide --input)")?,
        contribution: args.contribution,
        contribution_growth: args.contribution_growth,
        contribution_timing: if args.at_start {
            ContributionTiming::Beginning
        } else {
            ContributionTiming::End
        },
        one_time_deposits: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inherited_flag_selects_account_type() {
        let args = RmdArgs {
            input: None,
            balance: Some(dec!(250000)),
            birth_date: NaiveDate::from_ymd_opt(1980, 3, 15),
            year: Some(2025),
            inherited_from: Some(2024),
            expected_return: dec!(0.04),
            projection_years: 10,
        };
        let built = rmd_from_flags(&args).unwrap();
        assert_eq!(
            built.account_type,
            AccountType::Inherited {
                year_of_death: 2024
            }
        );
        let out = rmd::calculate_rmd(&built).unwrap().result;
        assert!(out.rmd_required);
    }

    #[test]
    fn test_savings_flags() {
        let args = SavingsArgs {
            input: None,
            initial: dec!(1000),
            rate: Some(dec!(0.05)),
            compounds_per_year: 1,
            years: Some(2),
            contribution: Decimal::ZERO,
            contribution_growth: Decimal::ZERO,
            at_start: true,
        };
        let built = savings_from_flags(&args).unwrap();
        assert_eq!(built.contribution_timing, ContributionTiming::Beginning);
        let out = savings::calculate_savings(&built).unwrap().result;
        assert_eq!(out.future_value, dec!(1102.5));
    }

    #[test]
    fn test_rmd_requires_birth_date() {
        let args = RmdArgs {
            input: None,
            balance: Some(dec!(1)),
            birth_date: None,
            year: Some(2025),
            inherited_from: None,
            expected_return: Decimal::ZERO,
            projection_years: 20,
        };
        assert!(rmd_from_flags(&args)
            .unwrap_err()
            .to_string()
            .contains("--birth-date"));
    }
}

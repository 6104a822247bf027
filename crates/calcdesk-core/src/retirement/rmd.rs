//! Required minimum distributions with a multi-year depletion projection.

use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::life_tables::{rmd_start_age, single_life_expectancy, uniform_lifetime_divisor};
use crate::error::CalcError;
use crate::projection::{
    project, validate_amortization_input, AmortizationInput, Direction, DivisorSchedule,
    DivisorTable, PaymentPolicy,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CalcResult;

const MAX_PROJECTION_YEARS: u32 = 60;

fn default_projection_years() -> u32 {
    20
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Ira,
    Traditional401k,
    /// Non-spouse beneficiary: single-life expectancy fixed in the year after
    /// death, reduced by one each later year.
    Inherited { year_of_death: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdInput {
    /// Account value on December 31 of the prior year.
    pub account_balance: Money,
    /// Birth date of the person whose life expectancy applies
    /// (the owner, or the beneficiary for inherited accounts).
    pub birth_date: NaiveDate,
    /// Distribution year being calculated.
    pub as_of_year: i32,
    pub account_type: AccountType,
    /// Expected annual return used for the projection.
    #[serde(default)]
    pub expected_return: Rate,
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdYear {
    pub year: i32,
    pub age: u32,
    pub starting_balance: Money,
    pub divisor: Option<Decimal>,
    pub distribution: Money,
    pub growth: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdOutput {
    pub age: u32,
    /// Age at which distributions become mandatory.
    pub start_age: u32,
    pub rmd_required: bool,
    pub divisor: Option<Decimal>,
    pub current_year_rmd: Money,
    pub total_distributions: Money,
    pub final_balance: Money,
    pub projection: Vec<RmdYear>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_rmd(input: &RmdInput) -> CalcResult<ComputationOutput<RmdOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_rmd(input)?;

    let birth_year = input.birth_date.year();
    let age = (input.as_of_year - birth_year) as u32;

    let (start_period, start_age, divisors) = match input.account_type {
        AccountType::Ira | AccountType::Traditional401k => {
            let start_age = rmd_start_age(birth_year);
            let first_age = age.max(start_age);
            let start_period = first_age - age + 1;
            let last_age = age + input.projection_years - 1;
            let divisors: Vec<Decimal> = (first_age..=last_age.max(first_age))
                .map(uniform_lifetime_divisor)
                .collect();
            (start_period, start_age, divisors)
        }
        AccountType::Inherited { year_of_death } => {
            let first_year = year_of_death + 1;
            let first_age = (first_year - birth_year).max(0) as u32;
            let initial = single_life_expectancy(first_age);
            let start_period = if first_year > input.as_of_year {
                (first_year - input.as_of_year) as u32 + 1
            } else {
                1
            };
            let first_projected_year = input.as_of_year + start_period as i32 - 1;
            let elapsed_at_start = (first_projected_year - first_year) as u32;
            let divisors: Vec<Decimal> = (0..input.projection_years)
                .map(|k| {
                    (initial - Decimal::from(elapsed_at_start + k)).max(Decimal::ONE)
                })
                .collect();
            (start_period, first_age, divisors)
        }
    };

    let schedule = DivisorSchedule::new(start_period, divisors);
    let current_divisor = schedule.divisor(1);

    let projection_input = AmortizationInput {
        principal: input.account_balance,
        periodic_rate: input.expected_return,
        horizon_periods: input.projection_years,
        payment: PaymentPolicy::Divisor(schedule.clone()),
        extra_recurring: Decimal::ZERO,
        extra_one_time: None,
        direction: Direction::Depleting,
    };
    validate_amortization_input(&projection_input)?;
    let result = project(&projection_input);

    let mut opening = input.account_balance;
    let projection: Vec<RmdYear> = result
        .ledger
        .iter()
        .map(|entry| {
            let row = RmdYear {
                year: input.as_of_year + entry.period as i32 - 1,
                age: age + entry.period - 1,
                starting_balance: opening,
                divisor: schedule.divisor(entry.period),
                distribution: entry.payment,
                growth: entry.interest,
                ending_balance: entry.balance,
            };
            opening = entry.balance;
            row
        })
        .collect();

    let current_year_rmd = match current_divisor {
        Some(d) => input.account_balance / d,
        None => Decimal::ZERO,
    };
    let rmd_required = current_divisor.is_some();
    if !rmd_required {
        warnings.push(format!(
            "No distribution required in {}; distributions begin at age {}",
            input.as_of_year, start_age
        ));
    }
    if result.resolved {
        warnings.push(format!(
            "Account fully distributed after {} years",
            result.periods_used
        ));
    }
    if result.overflowed {
        warnings.push(format!(
            "Projected balance exceeds the representable range after {} years; projection truncated",
            result.periods_used
        ));
    }

    let total_distributions = projection
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.distribution))
        .ok_or_else(|| CalcError::overflow("total distributions"))?;
    debug!(
        "rmd: age {} divisor {:?} current-year distribution {}",
        age, current_divisor, current_year_rmd
    );

    let output = RmdOutput {
        age,
        start_age,
        rmd_required,
        divisor: current_divisor,
        current_year_rmd,
        total_distributions,
        final_balance: result.final_balance,
        projection,
    };

    let methodology = match input.account_type {
        AccountType::Inherited { .. } => {
            "Inherited account RMD: single-life expectancy, non-recalculated"
        }
        _ => "RMD using the IRS Uniform Lifetime Table",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

fn validate_rmd(input: &RmdInput) -> CalcResult<()> {
    if input.account_balance <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "account_balance",
            "Account balance must be > 0",
        ));
    }
    let birth_year = input.birth_date.year();
    if input.as_of_year < birth_year {
        return Err(CalcError::invalid(
            "as_of_year",
            "Distribution year cannot precede the birth year",
        ));
    }
    if input.as_of_year - birth_year > 130 {
        return Err(CalcError::invalid("birth_date", "Age must be 130 or less"));
    }
    if input.expected_return <= Decimal::NEGATIVE_ONE || input.expected_return > Decimal::ONE {
        return Err(CalcError::invalid(
            "expected_return",
            "Expected return must be in (-1, 1]",
        ));
    }
    if input.projection_years == 0 || input.projection_years > MAX_PROJECTION_YEARS {
        return Err(CalcError::invalid(
            "projection_years",
            format!("Projection must cover 1 to {MAX_PROJECTION_YEARS} years"),
        ));
    }
    if let AccountType::Inherited { year_of_death } = input.account_type {
        if year_of_death < birth_year {
            return Err(CalcError::invalid(
                "year_of_death",
                "Year of death cannot precede the beneficiary's birth year",
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Future value of savings with compounding and escalating contributions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::time_value::{compound, future_value};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CalcResult;

const MAX_YEARS: u32 = 100;

fn default_compounds_per_year() -> u32 {
    12
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionTiming {
    /// Deposit before the period's interest is credited.
    Beginning,
    #[default]
    End,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneTimeDeposit {
    /// 1-indexed year; the deposit lands at the start of that year.
    pub year: u32,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsInput {
    pub initial_deposit: Money,
    pub annual_rate: Rate,
    #[serde(default = "default_compounds_per_year")]
    pub compounds_per_year: u32,
    pub years: u32,
    /// Deposit made every compounding period during the first year.
    #[serde(default)]
    pub contribution: Money,
    /// Annual escalation of the periodic contribution (0.03 = +3% per year).
    #[serde(default)]
    pub contribution_growth: Rate,
    #[serde(default)]
    pub contribution_timing: ContributionTiming,
    #[serde(default)]
    pub one_time_deposits: Vec<OneTimeDeposit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsYear {
    pub year: u32,
    pub starting_balance: Money,
    pub contributions: Money,
    pub interest: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsOutput {
    pub future_value: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    pub effective_annual_rate: Rate,
    /// Closed-form future value, available when contributions are level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_form_future_value: Option<Money>,
    pub year_by_year: Vec<SavingsYear>,
}

pub fn calculate_savings(input: &SavingsInput) -> CalcResult<ComputationOutput<SavingsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_savings(input)?;

    let m = input.compounds_per_year;
    let periodic_rate = input.annual_rate / Decimal::from(m);
    let at_start = input.contribution_timing == ContributionTiming::Beginning;

    let mut balance = input.initial_deposit;
    let mut contribution = input.contribution;
    let mut total_contributions = input.initial_deposit;
    let mut total_interest = Decimal::ZERO;
    let mut year_by_year = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        let starting_balance = balance;
        let mut contributed = Decimal::ZERO;
        let mut earned = Decimal::ZERO;

        for deposit in input.one_time_deposits.iter().filter(|d| d.year == year) {
            balance = grow(balance.checked_add(deposit.amount))?;
            contributed = grow(contributed.checked_add(deposit.amount))?;
        }

        for _ in 0..m {
            if at_start {
                balance = grow(balance.checked_add(contribution))?;
            }
            let interest = grow(balance.checked_mul(periodic_rate))?;
            balance = grow(balance.checked_add(interest))?;
            earned = grow(earned.checked_add(interest))?;
            if !at_start {
                balance = grow(balance.checked_add(contribution))?;
            }
            contributed = grow(contributed.checked_add(contribution))?;
        }

        total_contributions = grow(total_contributions.checked_add(contributed))?;
        total_interest = grow(total_interest.checked_add(earned))?;
        year_by_year.push(SavingsYear {
            year,
            starting_balance,
            contributions: contributed,
            interest: earned,
            ending_balance: balance,
        });

        contribution = grow(contribution.checked_mul(Decimal::ONE + input.contribution_growth))?;
    }

    let closed_form_future_value =
        if input.contribution_growth.is_zero() && input.one_time_deposits.is_empty() {
            match future_value(
                input.initial_deposit,
                periodic_rate,
                m * input.years,
                input.contribution,
                at_start,
            ) {
                Ok(fv) => Some(fv),
                Err(e) => {
                    warnings.push(format!("Closed-form cross-check skipped: {e}"));
                    None
                }
            }
        } else {
            None
        };

    let effective_annual_rate = compound(periodic_rate, m)? - Decimal::ONE;

    let output = SavingsOutput {
        future_value: balance,
        total_contributions,
        total_interest,
        effective_annual_rate,
        closed_form_future_value,
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Periodic compounding with escalating contributions",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn grow(value: Option<Decimal>) -> CalcResult<Decimal> {
    value.ok_or_else(|| CalcError::overflow("savings balance"))
}

fn validate_savings(input: &SavingsInput) -> CalcResult<()> {
    if input.initial_deposit < Decimal::ZERO || input.contribution < Decimal::ZERO {
        return Err(CalcError::invalid(
            "initial_deposit",
            "Deposits and contributions must be >= 0",
        ));
    }
    if input.annual_rate < dec!(-0.5) || input.annual_rate > Decimal::ONE {
        return Err(CalcError::invalid(
            "annual_rate",
            "Annual rate must be in [-0.5, 1]",
        ));
    }
    if !matches!(input.compounds_per_year, 1 | 2 | 4 | 12 | 52 | 365) {
        return Err(CalcError::invalid(
            "compounds_per_year",
            "Compounding must be 1, 2, 4, 12, 52 or 365 times per year",
        ));
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(CalcError::invalid(
            "years",
            format!("Years must be between 1 and {MAX_YEARS}"),
        ));
    }
    if input.contribution_growth <= Decimal::NEGATIVE_ONE {
        return Err(CalcError::invalid(
            "contribution_growth",
            "Contribution growth must be > -100%",
        ));
    }
    if let Some(bad) = input
        .one_time_deposits
        .iter()
        .find(|d| d.year == 0 || d.year > input.years || d.amount < Decimal::ZERO)
    {
        return Err(CalcError::invalid(
            "one_time_deposits",
            format!("Deposit in year {} is outside the horizon or negative", bad.year),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn monthly_plan() -> SavingsInput {
        SavingsInput {
            initial_deposit: dec!(10000),
            annual_rate: dec!(0.06),
            compounds_per_year: 12,
            years: 10,
            contribution: dec!(200),
            contribution_growth: Decimal::ZERO,
            contribution_timing: ContributionTiming::End,
            one_time_deposits: Vec::new(),
        }
    }

    #[test]
    fn test_loop_matches_closed_form() {
        let out = calculate_savings(&monthly_plan()).unwrap().result;
        let closed = out.closed_form_future_value.unwrap();
        assert_close(out.future_value, closed, dec!(0.000001), "closed form");
        // 10000 * 1.005^120 + 200 * (1.005^120 - 1) / 0.005
        assert_close(out.future_value, dec!(50969.84), dec!(0.01), "fv");
    }

    #[test]
    fn test_beginning_timing_earns_more() {
        let end = calculate_savings(&monthly_plan()).unwrap().result;
        let mut input = monthly_plan();
        input.contribution_timing = ContributionTiming::Beginning;
        let begin = calculate_savings(&input).unwrap().result;
        assert!(begin.future_value > end.future_value);
        assert_close(
            begin.future_value,
            begin.closed_form_future_value.unwrap(),
            dec!(0.000001),
            "annuity due",
        );
    }

    #[test]
    fn test_totals_reconcile() {
        let out = calculate_savings(&monthly_plan()).unwrap().result;
        assert_eq!(out.total_contributions, dec!(10000) + dec!(200) * dec!(120));
        assert_close(
            out.total_contributions + out.total_interest,
            out.future_value,
            dec!(0.000001),
            "reconcile",
        );
    }

    #[test]
    fn test_escalation_and_one_time_deposits() {
        let mut input = monthly_plan();
        input.contribution_growth = dec!(0.05);
        input.one_time_deposits = vec![OneTimeDeposit {
            year: 3,
            amount: dec!(5000),
        }];
        let out = calculate_savings(&input).unwrap().result;
        assert!(out.closed_form_future_value.is_none());
        assert_eq!(out.year_by_year[0].contributions, dec!(2400));
        assert_eq!(out.year_by_year[1].contributions, dec!(2520));
        assert_eq!(out.year_by_year[2].contributions, dec!(2646) + dec!(5000));
    }

    #[test]
    fn test_effective_annual_rate() {
        let out = calculate_savings(&monthly_plan()).unwrap().result;
        assert_close(out.effective_annual_rate, dec!(0.0616778), dec!(0.0000001), "EAR");
    }

    #[test]
    fn test_runaway_growth_is_an_error() {
        let mut input = monthly_plan();
        input.annual_rate = Decimal::ONE;
        input.compounds_per_year = 365;
        input.years = 100;
        let err = calculate_savings(&input).unwrap_err();
        assert!(matches!(err, CalcError::Infeasible(_)));
    }

    #[test]
    fn test_rejects_unusual_compounding() {
        let mut input = monthly_plan();
        input.compounds_per_year = 7;
        assert!(calculate_savings(&input).is_err());
    }
}

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::policy::{AmortizationInput, Direction, DivisorTable, PaymentPolicy};
use super::validation::validate_amortization_input;
use crate::time_value::annuity_payment;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CalcResult;

/// Sub-cent residual below which a balance counts as settled.
pub const BALANCE_EPSILON: Decimal = dec!(0.005);

/// Upper bound on the ledger's initial allocation.
const LEDGER_PREALLOC: u32 = 1_200;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One projected period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// 1-indexed period number.
    pub period: u32,
    /// Base payment plus extra actually applied this period.
    pub payment: Money,
    /// Interest charged (amortizing) or growth credited (depleting).
    pub interest: Money,
    /// Scheduled principal: payment - interest, or the full withdrawal when depleting.
    pub principal: Money,
    /// Extra amount applied on top of the base payment.
    pub extra: Money,
    /// Balance at period end. Never negative.
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub ledger: Vec<LedgerEntry>,
    pub total_interest: Money,
    pub total_paid: Money,
    pub periods_used: u32,
    pub final_balance: Money,
    /// True when the balance reached zero within the horizon.
    pub resolved: bool,
    /// True when a growing balance left the `Decimal` range and the
    /// projection stopped before the horizon.
    pub overflowed: bool,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project a balance period by period until it settles or the horizon ends.
///
/// Pure and infallible: input validation is the caller's job (see
/// [`validate_amortization_input`]). A schedule that never pays down the
/// balance simply runs to the horizon with `resolved == false`. If the
/// balance grows past what `Decimal` can hold, the ledger stops at the last
/// representable period and `overflowed` is set. An annuity payment that
/// cannot be represented at all leaves the ledger empty with the same flag.
pub fn project(input: &AmortizationInput) -> ProjectionResult {
    let mut ledger = Vec::with_capacity(input.horizon_periods.min(LEDGER_PREALLOC) as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut overflowed = false;

    let level_payment = match input.payment {
        PaymentPolicy::Annuity if input.horizon_periods > 0 => {
            annuity_payment(input.principal, input.periodic_rate, input.horizon_periods).ok()
        }
        _ => Some(Decimal::ZERO),
    };

    match level_payment {
        None => overflowed = true,
        Some(level) => {
            for period in 1..=input.horizon_periods {
                let step = advance(input, balance, period, level).and_then(|entry| {
                    let interest = total_interest.checked_add(entry.interest)?;
                    let paid = total_paid.checked_add(entry.payment)?;
                    Some((entry, interest, paid))
                });
                let Some((entry, interest, paid)) = step else {
                    overflowed = true;
                    break;
                };

                balance = entry.balance;
                total_interest = interest;
                total_paid = paid;
                ledger.push(entry);

                if balance.is_zero() {
                    break;
                }
            }
        }
    }

    let periods_used = ledger.len() as u32;
    let resolved = balance.is_zero();
    debug!(
        "projection: {:?} over {} of {} periods, final balance {}",
        input.direction, periods_used, input.horizon_periods, balance
    );

    ProjectionResult {
        ledger,
        total_interest,
        total_paid,
        periods_used,
        final_balance: balance,
        resolved,
        overflowed,
    }
}

/// One period of the projection, or `None` if its arithmetic overflows.
fn advance(
    input: &AmortizationInput,
    balance: Money,
    period: u32,
    level: Money,
) -> Option<LedgerEntry> {
    let interest = balance.checked_mul(input.periodic_rate)?;
    let mut payment = base_payment(&input.payment, balance, period, level)?;
    let mut extra = input.extra_for(period);

    // Amount that fully settles the account this period. Both directions
    // move the balance by the same arithmetic; only the reported
    // principal differs.
    let due = balance.checked_add(interest)?;
    let remaining = due.checked_sub(payment)?.checked_sub(extra)?;

    let balance = if remaining < BALANCE_EPSILON {
        // Fold the overshoot back: trim the extra first, then the payment.
        if payment >= due {
            payment = due;
            extra = Decimal::ZERO;
        } else {
            extra = due - payment;
        }
        Decimal::ZERO
    } else {
        remaining
    };

    let principal = match input.direction {
        Direction::Amortizing => payment - interest,
        Direction::Depleting => payment,
    };

    Some(LedgerEntry {
        period,
        payment: payment.checked_add(extra)?,
        interest,
        principal,
        extra,
        balance,
    })
}

fn base_payment(
    policy: &PaymentPolicy,
    balance: Money,
    period: u32,
    level: Money,
) -> Option<Money> {
    match policy {
        PaymentPolicy::Scheduled { amount } => Some(*amount),
        PaymentPolicy::Annuity => Some(level),
        PaymentPolicy::MinimumPercentage {
            min_pct,
            floor_amount,
        } => Some(balance.checked_mul(*min_pct)?.max(*floor_amount)),
        PaymentPolicy::Divisor(table) => match table.divisor(period) {
            Some(d) if d > Decimal::ZERO => balance.checked_div(d),
            _ => Some(Decimal::ZERO),
        },
    }
}

/// Validate, project, and wrap the result in the standard output envelope.
pub fn run_projection(
    input: &AmortizationInput,
) -> CalcResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    validate_amortization_input(input)?;

    let result = project(input);

    let mut warnings = Vec::new();
    if result.overflowed {
        warn!(
            "projection overflowed after {} of {} periods",
            result.periods_used, input.horizon_periods
        );
        warnings.push(format!(
            "Balance grew beyond the representable range after {} periods; projection stopped early",
            result.periods_used
        ));
    } else if !result.resolved {
        warn!(
            "projection did not settle within {} periods (balance {})",
            input.horizon_periods, result.final_balance
        );
        warnings.push(format!(
            "Balance of {} remains after {} periods; the schedule does not pay off within the horizon",
            result.final_balance.round_dp(2),
            input.horizon_periods
        ));
    }

    let methodology = match input.direction {
        Direction::Amortizing => "Amortizing balance projection (interest accrues before principal)",
        Direction::Depleting => "Depleting balance projection (growth credited, withdrawal deducted)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Credit-card payoff under a minimum-payment rule or a fixed monthly payment.

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::projection::{
    project, validate_amortization_input, AmortizationInput, Direction, LedgerEntry,
    PaymentPolicy,
};
use crate::time_value::annuity_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const MAX_MONTHS: u32 = 1_200;

fn default_min_payment_pct() -> Rate {
    dec!(0.03)
}

fn default_min_payment_floor() -> Money {
    dec!(25)
}

fn default_max_months() -> u32 {
    360
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardInput {
    pub balance: Money,
    /// Annual percentage rate (0.18 = 18%).
    pub apr: Rate,
    /// Share of the statement balance due each month.
    #[serde(default = "default_min_payment_pct")]
    pub min_payment_pct: Rate,
    /// Smallest minimum payment the issuer accepts.
    #[serde(default = "default_min_payment_floor")]
    pub min_payment_floor: Money,
    /// Pay this amount every month instead of the minimum.
    #[serde(default)]
    pub fixed_payment: Option<Money>,
    #[serde(default)]
    pub extra_monthly: Money,
    /// Projection cap.
    #[serde(default = "default_max_months")]
    pub max_months: u32,
    /// Also report the level payment that clears the card in this many months.
    #[serde(default)]
    pub target_months: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardOutput {
    pub paid_off: bool,
    /// Months until the balance reaches zero, if it does within the cap.
    pub months_to_payoff: Option<u32>,
    pub months_projected: u32,
    pub first_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_for_target: Option<Money>,
    pub schedule: Vec<LedgerEntry>,
}

pub fn calculate_credit_card_payoff(
    input: &CreditCardInput,
) -> CalcResult<ComputationOutput<CreditCardOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.balance <= Decimal::ZERO {
        return Err(CalcError::invalid("balance", "Balance must be > 0"));
    }
    if input.apr < Decimal::ZERO || input.apr > Decimal::ONE {
        return Err(CalcError::invalid("apr", "APR must be in [0, 1]"));
    }
    if input.max_months == 0 || input.max_months > MAX_MONTHS {
        return Err(CalcError::invalid(
            "max_months",
            format!("max_months must be between 1 and {MAX_MONTHS}"),
        ));
    }

    let periodic_rate = input.apr / MONTHS_PER_YEAR;
    let payment = match input.fixed_payment {
        Some(amount) => PaymentPolicy::Scheduled { amount },
        None => PaymentPolicy::MinimumPercentage {
            min_pct: input.min_payment_pct,
            floor_amount: input.min_payment_floor,
        },
    };

    let projection_input = AmortizationInput {
        principal: input.balance,
        periodic_rate,
        horizon_periods: input.max_months,
        payment,
        extra_recurring: input.extra_monthly,
        extra_one_time: None,
        direction: Direction::Amortizing,
    };
    validate_amortization_input(&projection_input)?;

    if input.fixed_payment.is_none() {
        let first_interest = input.balance * periodic_rate;
        let first_min = (input.balance * input.min_payment_pct).max(input.min_payment_floor);
        if first_min + input.extra_monthly <= first_interest {
            warnings.push(
                "Minimum payment does not cover monthly interest; the balance will grow".into(),
            );
        }
    }

    let result = project(&projection_input);

    if result.overflowed {
        warn!(
            "credit card balance overflowed after {} months",
            result.periods_used
        );
        warnings.push(format!(
            "Balance grew beyond the representable range after {} months; projection stopped early",
            result.periods_used
        ));
    } else if !result.resolved {
        warn!(
            "credit card balance not cleared within {} months",
            input.max_months
        );
        warnings.push(format!(
            "Balance not paid off within {} months; {} remains",
            input.max_months,
            result.final_balance.round_dp(2)
        ));
    }

    let payment_for_target = match input.target_months {
        Some(0) => {
            return Err(CalcError::invalid("target_months", "target_months must be > 0"));
        }
        Some(months) => Some(annuity_payment(input.balance, periodic_rate, months)?),
        None => None,
    };

    let first_payment = result
        .ledger
        .first()
        .map(|e| e.payment)
        .unwrap_or(Decimal::ZERO);

    let output = CreditCardOutput {
        paid_off: result.resolved,
        months_to_payoff: result.resolved.then_some(result.periods_used),
        months_projected: result.periods_used,
        first_payment,
        total_interest: result.total_interest,
        total_paid: result.total_paid,
        remaining_balance: result.final_balance,
        payment_for_target,
        schedule: result.ledger,
    };

    let methodology = if input.fixed_payment.is_some() {
        "Credit card payoff with fixed monthly payment"
    } else {
        "Credit card payoff with percentage-of-balance minimum payment and floor"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn minimum_only() -> CreditCardInput {
        CreditCardInput {
            balance: dec!(5000),
            apr: dec!(0.18),
            min_payment_pct: dec!(0.03),
            min_payment_floor: dec!(25),
            fixed_payment: None,
            extra_monthly: Decimal::ZERO,
            max_months: 360,
            target_months: None,
        }
    }

    #[test]
    fn test_minimum_payment_first_month() {
        let out = calculate_credit_card_payoff(&minimum_only()).unwrap().result;
        // 3% of 5000
        assert_eq!(out.first_payment, dec!(150));
        // 1.5% monthly interest on 5000
        assert_eq!(out.schedule[0].interest, dec!(75));
    }

    #[test]
    fn test_minimum_payment_balance_strictly_decreases() {
        let out = calculate_credit_card_payoff(&minimum_only()).unwrap().result;
        let mut previous = dec!(5000);
        for entry in &out.schedule {
            assert!(entry.balance < previous, "period {}", entry.period);
            previous = entry.balance;
        }
        assert!(out.months_projected <= 360);
    }

    #[test]
    fn test_minimum_payment_pays_off_within_cap() {
        let out = calculate_credit_card_payoff(&minimum_only()).unwrap().result;
        assert!(out.paid_off);
        assert_eq!(out.months_to_payoff, Some(out.months_projected));
        assert_eq!(out.remaining_balance, Decimal::ZERO);
        assert!(out.total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_fixed_payment_beats_minimum() {
        let min = calculate_credit_card_payoff(&minimum_only()).unwrap().result;
        let mut input = minimum_only();
        input.fixed_payment = Some(dec!(250));
        let fixed = calculate_credit_card_payoff(&input).unwrap().result;
        assert!(fixed.months_projected < min.months_projected);
        assert!(fixed.total_interest < min.total_interest);
    }

    #[test]
    fn test_fixed_payment_below_interest_is_rejected() {
        let mut input = minimum_only();
        input.fixed_payment = Some(dec!(60));
        assert!(calculate_credit_card_payoff(&input).is_err());
    }

    #[test]
    fn test_short_cap_reports_unpaid_balance() {
        let mut input = minimum_only();
        input.max_months = 12;
        let out = calculate_credit_card_payoff(&input).unwrap();
        assert!(!out.result.paid_off);
        assert_eq!(out.result.months_to_payoff, None);
        assert!(out.result.remaining_balance > Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_payment_for_target() {
        let mut input = minimum_only();
        input.target_months = Some(24);
        let out = calculate_credit_card_payoff(&input).unwrap().result;
        // 5000 over 24 months at 1.5%: 249.62
        let pmt = out.payment_for_target.unwrap();
        assert!((pmt - dec!(249.62)).abs() < dec!(0.01));
    }

    #[test]
    fn test_rejects_cap_beyond_limit() {
        let mut input = minimum_only();
        input.max_months = MAX_MONTHS + 1;
        let err = calculate_credit_card_payoff(&input).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "max_months"));
    }

    #[test]
    fn test_growing_balance_stops_instead_of_panicking() {
        let input = CreditCardInput {
            apr: Decimal::ONE,
            min_payment_pct: dec!(0.01),
            min_payment_floor: Decimal::ZERO,
            max_months: MAX_MONTHS,
            ..minimum_only()
        };
        let out = calculate_credit_card_payoff(&input).unwrap();
        assert!(!out.result.paid_off);
        assert!(out.result.months_projected < MAX_MONTHS);
        assert!(out.warnings.iter().any(|w| w.contains("interest")));
        assert!(out.warnings.iter().any(|w| w.contains("representable range")));
    }

    #[test]
    fn test_rejects_zero_balance() {
        let mut input = minimum_only();
        input.balance = Decimal::ZERO;
        assert!(calculate_credit_card_payoff(&input).is_err());
    }
}

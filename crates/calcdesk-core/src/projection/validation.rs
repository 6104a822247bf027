use rust_decimal::Decimal;

use super::policy::{AmortizationInput, Direction, PaymentPolicy};
use crate::error::CalcError;
use crate::time_value::annuity_payment;
use crate::CalcResult;

/// Reject inputs the projection engine is not meant to see.
///
/// The engine assumes a positive principal, a non-negative rate and a
/// horizon of at least one period. An amortizing fixed payment that never
/// covers the first period's interest is rejected here as well, since the
/// balance could only grow.
pub fn validate_amortization_input(input: &AmortizationInput) -> CalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(CalcError::invalid("principal", "Principal must be > 0"));
    }
    if input.periodic_rate < Decimal::ZERO {
        return Err(CalcError::invalid(
            "periodic_rate",
            "Periodic rate must be >= 0",
        ));
    }
    if input.horizon_periods == 0 {
        return Err(CalcError::invalid(
            "horizon_periods",
            "Horizon must be at least one period",
        ));
    }
    if input.extra_recurring < Decimal::ZERO {
        return Err(CalcError::invalid(
            "extra_recurring",
            "Recurring extra amount must be >= 0",
        ));
    }
    if let Some(extra) = input.extra_one_time {
        if extra.amount < Decimal::ZERO {
            return Err(CalcError::invalid(
                "extra_one_time.amount",
                "One-time extra amount must be >= 0",
            ));
        }
        if extra.period == 0 || extra.period > input.horizon_periods {
            return Err(CalcError::invalid(
                "extra_one_time.period",
                format!(
                    "One-time extra period must be within 1..={}",
                    input.horizon_periods
                ),
            ));
        }
    }

    match &input.payment {
        PaymentPolicy::Scheduled { amount } => {
            if *amount < Decimal::ZERO {
                return Err(CalcError::invalid(
                    "payment.amount",
                    "Scheduled payment must be >= 0",
                ));
            }
            let first_interest = input.principal * input.periodic_rate;
            if input.direction == Direction::Amortizing
                && *amount + input.extra_recurring <= first_interest
            {
                return Err(CalcError::invalid(
                    "payment.amount",
                    format!(
                        "Payment of {} does not exceed first-period interest of {}; the balance would never decrease",
                        amount,
                        first_interest.round_dp(2)
                    ),
                ));
            }
        }
        PaymentPolicy::Annuity => {
            annuity_payment(input.principal, input.periodic_rate, input.horizon_periods)?;
        }
        PaymentPolicy::MinimumPercentage {
            min_pct,
            floor_amount,
        } => {
            if *min_pct <= Decimal::ZERO || *min_pct > Decimal::ONE {
                return Err(CalcError::invalid(
                    "payment.min_pct",
                    "Minimum payment percentage must be in (0, 1]",
                ));
            }
            if *floor_amount < Decimal::ZERO {
                return Err(CalcError::invalid(
                    "payment.floor_amount",
                    "Minimum payment floor must be >= 0",
                ));
            }
        }
        PaymentPolicy::Divisor(table) => {
            if table.divisors.is_empty() {
                return Err(CalcError::InsufficientData(
                    "Divisor schedule requires at least one divisor".into(),
                ));
            }
            if table.divisors.iter().any(|d| *d <= Decimal::ZERO) {
                return Err(CalcError::invalid(
                    "payment.divisors",
                    "Every divisor must be > 0",
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::policy::{DivisorSchedule, OneTimeExtra};
    use rust_decimal_macros::dec;

    fn base() -> AmortizationInput {
        AmortizationInput::annuity(dec!(10000), dec!(0.01), 36)
    }

    fn field_of(err: CalcError) -> String {
        match err {
            CalcError::InvalidInput { field, .. } => field,
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_annuity_passes() {
        assert!(validate_amortization_input(&base()).is_ok());
    }

    #[test]
    fn test_unrepresentable_annuity_payment_is_reported() {
        let input = AmortizationInput::annuity(Decimal::MAX, dec!(2), 12);
        let err = validate_amortization_input(&input).unwrap_err();
        assert!(matches!(err, CalcError::Infeasible(_)));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let input = AmortizationInput {
            periodic_rate: dec!(-0.01),
            ..base()
        };
        let err = validate_amortization_input(&input).unwrap_err();
        assert_eq!(field_of(err), "periodic_rate");
    }

    #[test]
    fn test_rejects_zero_horizon() {
        let input = AmortizationInput {
            horizon_periods: 0,
            ..base()
        };
        let err = validate_amortization_input(&input).unwrap_err();
        assert_eq!(field_of(err), "horizon_periods");
    }

    #[test]
    fn test_rejects_payment_not_covering_interest() {
        let input = AmortizationInput {
            payment: PaymentPolicy::Scheduled { amount: dec!(100) },
            ..base()
        };
        // First-period interest is exactly 100
        let err = validate_amortization_input(&input).unwrap_err();
        assert_eq!(field_of(err), "payment.amount");
    }

    #[test]
    fn test_depleting_fixed_withdrawal_below_growth_is_allowed() {
        let input = AmortizationInput {
            payment: PaymentPolicy::Scheduled { amount: dec!(50) },
            direction: Direction::Depleting,
            ..base()
        };
        assert!(validate_amortization_input(&input).is_ok());
    }

    #[test]
    fn test_rejects_one_time_extra_outside_horizon() {
        let input = AmortizationInput {
            extra_one_time: Some(OneTimeExtra {
                period: 37,
                amount: dec!(500),
            }),
            ..base()
        };
        let err = validate_amortization_input(&input).unwrap_err();
        assert_eq!(field_of(err), "extra_one_time.period");
    }

    #[test]
    fn test_rejects_non_positive_divisor() {
        let input = AmortizationInput {
            payment: PaymentPolicy::Divisor(DivisorSchedule::new(1, vec![dec!(10), dec!(0)])),
            direction: Direction::Depleting,
            ..base()
        };
        let err = validate_amortization_input(&input).unwrap_err();
        assert_eq!(field_of(err), "payment.divisors");
    }

    #[test]
    fn test_rejects_empty_divisor_schedule() {
        let input = AmortizationInput {
            payment: PaymentPolicy::Divisor(DivisorSchedule::new(1, Vec::new())),
            direction: Direction::Depleting,
            ..base()
        };
        assert!(matches!(
            validate_amortization_input(&input),
            Err(CalcError::InsufficientData(_))
        ));
    }
}

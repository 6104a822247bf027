use rust_decimal::Decimal;

use crate::error::CalcError;
use crate::types::{Money, Rate};
use crate::CalcResult;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Fails with `Infeasible` once the factor outgrows `Decimal`.
pub fn compound(rate: Rate, n: u32) -> CalcResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| CalcError::overflow("compound factor"))?;
    }
    Ok(result)
}

/// Compute (1 + r)^-n. For positive rates the factor shrinks toward zero,
/// so long horizons stay representable where [`compound`] would overflow.
pub fn discount(rate: Rate, n: u32) -> CalcResult<Decimal> {
    let base = Decimal::ONE + rate;
    if base <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "rate",
            "Periodic rate must be greater than -100%",
        ));
    }
    let step = Decimal::ONE
        .checked_div(base)
        .ok_or_else(|| CalcError::overflow("discount step"))?;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(step)
            .ok_or_else(|| CalcError::overflow("discount factor"))?;
    }
    Ok(result)
}

/// Level payment that retires `principal` over `nper` periods at `rate`.
///
/// Positive sign convention: a positive principal yields a positive payment.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    if nper == 0 {
        return Err(CalcError::invalid("nper", "Number of periods must be > 0"));
    }
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(CalcError::invalid(
            "rate",
            "Periodic rate must be greater than -100%",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    // P * r / (1 - v^n)
    let annuity_factor = Decimal::ONE - discount(rate, nper)?;
    if annuity_factor.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(annuity_factor))
        .ok_or_else(|| CalcError::overflow("annuity payment"))
}

/// Present value of a level payment stream received at period end.
pub fn present_value_annuity(payment: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(nper))
            .ok_or_else(|| CalcError::overflow("present value"));
    }

    let annuity_factor = Decimal::ONE - discount(rate, nper)?;
    payment
        .checked_mul(annuity_factor)
        .and_then(|pv| pv.checked_div(rate))
        .ok_or_else(|| CalcError::overflow("present value"))
}

/// Future value of a starting amount plus a level payment each period.
///
/// `payment_at_start` selects an annuity-due (deposit before the period's
/// interest is credited).
pub fn future_value(
    present: Money,
    rate: Rate,
    nper: u32,
    payment: Money,
    payment_at_start: bool,
) -> CalcResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(nper))
            .and_then(|paid| paid.checked_add(present))
            .ok_or_else(|| CalcError::overflow("future value"));
    }

    let factor = compound(rate, nper)?;
    let mut annuity = payment
        .checked_mul(factor - Decimal::ONE)
        .and_then(|grown| grown.checked_div(rate))
        .ok_or_else(|| CalcError::overflow("future value"))?;
    if payment_at_start {
        annuity = annuity
            .checked_mul(Decimal::ONE + rate)
            .ok_or_else(|| CalcError::overflow("future value"))?;
    }
    present
        .checked_mul(factor)
        .and_then(|grown| grown.checked_add(annuity))
        .ok_or_else(|| CalcError::overflow("future value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_payment_36_month_loan() {
        let rate = dec!(0.05) / dec!(12);
        let result = annuity_payment(dec!(10000), rate, 36).unwrap();
        // Textbook value: 299.71
        assert!((result - dec!(299.71)).abs() < dec!(0.01));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let result = annuity_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_annuity_payment_rejects_zero_periods() {
        assert!(annuity_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_pv_inverts_payment() {
        let rate = dec!(0.08);
        let pmt = annuity_payment(dec!(671.01), rate, 10).unwrap();
        let pv = present_value_annuity(pmt, rate, 10).unwrap();
        assert!((pv - dec!(671.01)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_future_value_ordinary_and_due() {
        // 100 per year for 10 years at 5%: 1257.79 ordinary, 1320.68 due
        let ordinary = future_value(Decimal::ZERO, dec!(0.05), 10, dec!(100), false).unwrap();
        let due = future_value(Decimal::ZERO, dec!(0.05), 10, dec!(100), true).unwrap();
        assert!((ordinary - dec!(1257.79)).abs() < dec!(0.01));
        assert!((due - dec!(1320.68)).abs() < dec!(0.01));
    }

    #[test]
    fn test_compound_zero_periods_is_one() {
        assert_eq!(compound(dec!(0.07), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_reports_overflow() {
        // 1.12^600 is about 1.2e29, past Decimal::MAX
        let err = compound(dec!(0.12), 600).unwrap_err();
        assert!(matches!(err, CalcError::Infeasible(_)));
        assert!(future_value(dec!(10000), dec!(0.12), 600, Decimal::ZERO, false).is_err());
    }

    #[test]
    fn test_annuity_payment_long_horizon_high_rate() {
        // The discount factor vanishes, so the payment tends to interest only.
        let pmt = annuity_payment(dec!(10000), dec!(0.12), 600).unwrap();
        assert!((pmt - dec!(1200)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_discount_is_reciprocal_of_compound() {
        let product = discount(dec!(0.05), 20).unwrap() * compound(dec!(0.05), 20).unwrap();
        assert!((product - Decimal::ONE).abs() < dec!(0.0000000001));
    }
}

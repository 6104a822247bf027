//! Installment loan calculator: auto, personal and mortgage loans.
//!
//! Computes the level principal-and-interest payment, runs the balance
//! projection with any extra payments, and compares against a no-extra
//! baseline. Mortgages additionally carry escrow (property tax, insurance,
//! HOA) and PMI while the loan-to-value ratio stays above the drop-off point.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::projection::{
    project, validate_amortization_input, AmortizationInput, Direction, LedgerEntry,
    OneTimeExtra, PaymentPolicy,
};
use crate::time_value::annuity_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest term accepted (50 years).
const MAX_TERM_MONTHS: u32 = 600;

/// PMI is charged when the original loan exceeds this share of the price.
const PMI_REQUIRED_LTV: Decimal = dec!(0.80);

/// PMI stops once the balance falls to this share of the price.
const PMI_CANCEL_LTV: Decimal = dec!(0.78);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Mortgage-only costs collected alongside the P&I payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageTerms {
    pub home_price: Money,
    pub down_payment: Money,
    #[serde(default)]
    pub annual_property_tax: Money,
    #[serde(default)]
    pub annual_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
    /// Annual PMI premium as a fraction of the loan amount (e.g. 0.005).
    #[serde(default)]
    pub pmi_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoanType {
    Auto,
    Personal,
    Mortgage(MortgageTerms),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan_type: LoanType,
    /// Amount borrowed. Ignored for mortgages, where it is price minus down payment.
    #[serde(default)]
    pub amount: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    #[serde(default)]
    pub extra_monthly: Money,
    #[serde(default)]
    pub one_time_extra: Option<OneTimeExtra>,
    /// Loan origination date; the first payment falls one month later.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowBreakdown {
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub pmi: Money,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub extra: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub loan_amount: Money,
    /// Level principal-and-interest payment.
    pub monthly_payment: Money,
    /// P&I plus escrow and recurring extra.
    pub total_monthly_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow: Option<EscrowBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_to_value: Option<Rate>,
    pub payoff_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub total_interest: Money,
    /// Principal, interest and extras paid to the lender.
    pub total_paid: Money,
    /// Everything paid over the life of the loan, escrow and PMI included.
    pub total_cost: Money,
    pub interest_saved: Money,
    pub months_saved: u32,
    pub pmi_months: u32,
    pub schedule: Vec<LoanScheduleRow>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_loan(input: &LoanInput) -> CalcResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan(input)?;

    let loan_amount = match &input.loan_type {
        LoanType::Mortgage(m) => m.home_price - m.down_payment,
        _ => input.amount,
    };
    let periodic_rate = input.annual_rate / MONTHS_PER_YEAR;
    let monthly_payment = annuity_payment(loan_amount, periodic_rate, input.term_months)?;

    let projection_input = AmortizationInput {
        principal: loan_amount,
        periodic_rate,
        horizon_periods: input.term_months,
        payment: PaymentPolicy::Scheduled {
            amount: monthly_payment,
        },
        extra_recurring: input.extra_monthly,
        extra_one_time: input.one_time_extra,
        direction: Direction::Amortizing,
    };
    validate_amortization_input(&projection_input)?;

    let actual = project(&projection_input);
    let baseline = project(&AmortizationInput {
        extra_recurring: Decimal::ZERO,
        extra_one_time: None,
        ..projection_input.clone()
    });

    let interest_saved = (baseline.total_interest - actual.total_interest).max(Decimal::ZERO);
    let months_saved = baseline.periods_used.saturating_sub(actual.periods_used);

    // --- Mortgage escrow and PMI ---
    let (escrow, loan_to_value, pmi_months, total_pmi) = match &input.loan_type {
        LoanType::Mortgage(m) => {
            let ltv = loan_amount / m.home_price;
            let monthly_pmi = if ltv > PMI_REQUIRED_LTV {
                m.pmi_rate * loan_amount / MONTHS_PER_YEAR
            } else {
                Decimal::ZERO
            };
            let pmi_months = if monthly_pmi > Decimal::ZERO {
                count_pmi_months(loan_amount, &actual.ledger, m.home_price * PMI_CANCEL_LTV)
            } else {
                0
            };
            if monthly_pmi.is_zero() && ltv > PMI_REQUIRED_LTV {
                warnings.push(format!(
                    "Loan-to-value of {}% exceeds 80% but no PMI rate was supplied",
                    (ltv * dec!(100)).round_dp(1)
                ));
            }
            let property_tax = m.annual_property_tax / MONTHS_PER_YEAR;
            let insurance = m.annual_insurance / MONTHS_PER_YEAR;
            let escrow = EscrowBreakdown {
                property_tax,
                insurance,
                hoa: m.monthly_hoa,
                pmi: monthly_pmi,
                total: property_tax + insurance + m.monthly_hoa + monthly_pmi,
            };
            let total_pmi = monthly_pmi * Decimal::from(pmi_months);
            (Some(escrow), Some(ltv), pmi_months, total_pmi)
        }
        _ => (None, None, 0, Decimal::ZERO),
    };

    let escrow_monthly = escrow
        .as_ref()
        .map(|e| e.total - e.pmi)
        .unwrap_or(Decimal::ZERO);
    let total_monthly_payment = monthly_payment
        + input.extra_monthly
        + escrow.as_ref().map(|e| e.total).unwrap_or(Decimal::ZERO);
    let total_cost =
        actual.total_paid + escrow_monthly * Decimal::from(actual.periods_used) + total_pmi;

    let schedule: Vec<LoanScheduleRow> = actual
        .ledger
        .iter()
        .map(|entry| schedule_row(entry, input.start_date))
        .collect();
    let payoff_date = schedule.last().and_then(|row| row.date);

    let has_extras = input.extra_monthly > Decimal::ZERO || input.one_time_extra.is_some();
    if has_extras && months_saved == 0 {
        warnings.push("Extra payments do not shorten the loan term".into());
    }

    let output = LoanOutput {
        loan_amount,
        monthly_payment,
        total_monthly_payment,
        escrow,
        loan_to_value,
        payoff_months: actual.periods_used,
        payoff_date,
        total_interest: actual.total_interest,
        total_paid: actual.total_paid,
        total_cost,
        interest_saved,
        months_saved,
        pmi_months,
        schedule,
    };

    let methodology = match input.loan_type {
        LoanType::Mortgage(_) => "Mortgage amortization with escrow and PMI",
        LoanType::Auto => "Auto loan amortization",
        LoanType::Personal => "Personal loan amortization",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Count periods that open with the balance above the PMI cancellation point.
fn count_pmi_months(loan_amount: Money, ledger: &[LedgerEntry], cancel_balance: Money) -> u32 {
    let mut opening = loan_amount;
    let mut months = 0;
    for entry in ledger {
        if opening <= cancel_balance {
            break;
        }
        months += 1;
        opening = entry.balance;
    }
    months
}

fn schedule_row(entry: &LedgerEntry, start_date: Option<NaiveDate>) -> LoanScheduleRow {
    LoanScheduleRow {
        period: entry.period,
        date: start_date.and_then(|d| d.checked_add_months(Months::new(entry.period))),
        payment: entry.payment,
        principal: entry.principal,
        interest: entry.interest,
        extra: entry.extra,
        balance: entry.balance,
    }
}

fn validate_loan(input: &LoanInput) -> CalcResult<()> {
    if input.annual_rate < Decimal::ZERO || input.annual_rate >= Decimal::ONE {
        return Err(CalcError::invalid(
            "annual_rate",
            "Annual rate must be in [0, 1)",
        ));
    }
    if input.term_months == 0 || input.term_months > MAX_TERM_MONTHS {
        return Err(CalcError::invalid(
            "term_months",
            format!("Term must be between 1 and {MAX_TERM_MONTHS} months"),
        ));
    }
    if input.extra_monthly < Decimal::ZERO {
        return Err(CalcError::invalid(
            "extra_monthly",
            "Extra monthly payment must be >= 0",
        ));
    }

    match &input.loan_type {
        LoanType::Mortgage(m) => {
            if m.home_price <= Decimal::ZERO {
                return Err(CalcError::invalid("home_price", "Home price must be > 0"));
            }
            if m.down_payment < Decimal::ZERO || m.down_payment >= m.home_price {
                return Err(CalcError::invalid(
                    "down_payment",
                    "Down payment must be >= 0 and less than the home price",
                ));
            }
            if m.annual_property_tax < Decimal::ZERO
                || m.annual_insurance < Decimal::ZERO
                || m.monthly_hoa < Decimal::ZERO
            {
                return Err(CalcError::invalid(
                    "escrow",
                    "Property tax, insurance and HOA must be >= 0",
                ));
            }
            if m.pmi_rate < Decimal::ZERO || m.pmi_rate >= dec!(0.1) {
                return Err(CalcError::invalid("pmi_rate", "PMI rate must be in [0, 0.1)"));
            }
        }
        _ => {
            if input.amount <= Decimal::ZERO {
                return Err(CalcError::invalid("amount", "Loan amount must be > 0"));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

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

    fn auto_loan() -> LoanInput {
        LoanInput {
            loan_type: LoanType::Auto,
            amount: dec!(10000),
            annual_rate: dec!(0.05),
            term_months: 36,
            extra_monthly: Decimal::ZERO,
            one_time_extra: None,
            start_date: None,
        }
    }

    fn mortgage() -> LoanInput {
        LoanInput {
            loan_type: LoanType::Mortgage(MortgageTerms {
                home_price: dec!(400000),
                down_payment: dec!(40000),
                annual_property_tax: dec!(4800),
                annual_insurance: dec!(1200),
                monthly_hoa: dec!(50),
                pmi_rate: dec!(0.006),
            }),
            amount: Decimal::ZERO,
            annual_rate: dec!(0.065),
            term_months: 360,
            extra_monthly: Decimal::ZERO,
            one_time_extra: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        }
    }

    #[test]
    fn test_auto_loan_payment() {
        let out = calculate_loan(&auto_loan()).unwrap().result;
        assert_close(out.monthly_payment, dec!(299.71), dec!(0.01), "payment");
        assert_eq!(out.payoff_months, 36);
        assert_eq!(out.months_saved, 0);
        assert_eq!(out.interest_saved, Decimal::ZERO);
        assert!(out.escrow.is_none());
    }

    #[test]
    fn test_extra_payment_savings() {
        let mut input = auto_loan();
        input.extra_monthly = dec!(100);
        let out = calculate_loan(&input).unwrap().result;
        assert!(out.months_saved > 0);
        assert!(out.interest_saved > Decimal::ZERO);
        assert_eq!(out.payoff_months + out.months_saved, 36);
        assert_close(
            out.total_monthly_payment,
            dec!(399.71),
            dec!(0.01),
            "total monthly",
        );
    }

    #[test]
    fn test_mortgage_escrow_breakdown() {
        let out = calculate_loan(&mortgage()).unwrap().result;
        assert_eq!(out.loan_amount, dec!(360000));
        let escrow = out.escrow.unwrap();
        assert_eq!(escrow.property_tax, dec!(400));
        assert_eq!(escrow.insurance, dec!(100));
        assert_eq!(escrow.hoa, dec!(50));
        // 0.6% of 360k / 12
        assert_eq!(escrow.pmi, dec!(180));
        // 6.5% 30-year on 360k: 2275.44
        assert_close(out.monthly_payment, dec!(2275.44), dec!(0.01), "P&I");
        assert_eq!(out.loan_to_value, Some(dec!(0.9)));
    }

    #[test]
    fn test_mortgage_pmi_drops_before_term_end() {
        let out = calculate_loan(&mortgage()).unwrap().result;
        assert!(out.pmi_months > 0);
        assert!(out.pmi_months < 360);
        // Balance at the drop-off month is at or below 78% of the price
        let row = &out.schedule[(out.pmi_months - 1) as usize];
        assert!(row.balance <= dec!(312000));
    }

    #[test]
    fn test_no_pmi_with_twenty_percent_down() {
        let mut input = mortgage();
        if let LoanType::Mortgage(ref mut m) = input.loan_type {
            m.down_payment = dec!(80000);
        }
        let out = calculate_loan(&input).unwrap().result;
        assert_eq!(out.pmi_months, 0);
        assert_eq!(out.escrow.unwrap().pmi, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_dates_and_payoff_date() {
        let out = calculate_loan(&mortgage()).unwrap().result;
        assert_eq!(out.schedule[0].date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(out.payoff_date, NaiveDate::from_ymd_opt(2054, 1, 15));
    }

    #[test]
    fn test_rejects_down_payment_above_price() {
        let mut input = mortgage();
        if let LoanType::Mortgage(ref mut m) = input.loan_type {
            m.down_payment = dec!(400000);
        }
        assert!(calculate_loan(&input).is_err());
    }

    #[test]
    fn test_rejects_zero_term() {
        let mut input = auto_loan();
        input.term_months = 0;
        assert!(calculate_loan(&input).is_err());
    }

    #[test]
    fn test_rejects_rate_given_as_percentage() {
        let mut input = auto_loan();
        input.annual_rate = dec!(5);
        assert!(calculate_loan(&input).is_err());
    }
}

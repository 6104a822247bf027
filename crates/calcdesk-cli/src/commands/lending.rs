use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use calcdesk_core::lending::credit_card::{self, CreditCardInput};
use calcdesk_core::lending::loan::{self, LoanInput, LoanType, MortgageTerms};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanKind {
    Auto,
    Personal,
    Mortgage,
}

/// Arguments for an installment loan
#[derive(Args)]
pub struct LoanArgs {
    /// Path to a JSON loan input
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum, default_value = "auto")]
    pub kind: LoanKind,

    /// Amount borrowed (auto and personal loans)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Home price (mortgages)
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment (mortgages)
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual property tax (mortgages)
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual homeowner's insurance (mortgages)
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Monthly HOA dues (mortgages)
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Annual PMI rate as a fraction of the loan (mortgages)
    #[arg(long, default_value = "0")]
    pub pmi_rate: Decimal,

    /// Annual interest rate (0.065 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Extra principal paid every month
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Origination date (YYYY-MM-DD) for dated schedule rows
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for credit-card payoff
#[derive(Args)]
pub struct CreditCardArgs {
    /// Path to a JSON credit-card input
    #[arg(long)]
    pub input: Option<String>,

    /// Current balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual percentage rate (0.1999 = 19.99%)
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Minimum payment as a share of the balance
    #[arg(long, default_value = "0.03")]
    pub min_pct: Decimal,

    /// Minimum payment floor
    #[arg(long, default_value = "25")]
    pub min_floor: Decimal,

    /// Pay this fixed amount each month instead of the minimum
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Extra amount paid every month
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Projection cap in months
    #[arg(long, default_value = "360")]
    pub max_months: u32,

    /// Also report the payment that clears the card in this many months
    #[arg(long)]
    pub target_months: Option<u32>,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => loan_from_flags(&args)?,
    };
    let result = loan::calculate_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_credit_card(args: CreditCardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let card_input: CreditCardInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => card_from_flags(&args)?,
    };
    let result = credit_card::calculate_credit_card_payoff(&card_input)?;
    Ok(serde_json::to_value(result)?)
}

fn loan_from_flags(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let (loan_type, amount) = match args.kind {
        LoanKind::Mortgage => {
            let home_price = args
                .home_price
                .ok_or("--home-price is required for a mortgage (or provide --input)")?;
            let terms = MortgageTerms {
                home_price,
                down_payment: args.down_payment,
                annual_property_tax: args.property_tax,
                annual_insurance: args.insurance,
                monthly_hoa: args.hoa,
                pmi_rate: args.pmi_rate,
            };
            (LoanType::Mortgage(terms), home_price - args.down_payment)
        }
        kind => {
            let amount = args
                .amount
                .ok_or("--amount is required (or provide --input)")?;
            let loan_type = match kind {
                LoanKind::Personal => LoanType::Personal,
                _ => LoanType::Auto,
            };
            (loan_type, amount)
        }
    };

    Ok(LoanInput {
        loan_type,
        amount,
        annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
        extra_monthly: args.extra,
        one_time_extra: None,
        start_date: args.start_date,
    })
}

fn card_from_flags(args: &CreditCardArgs) -> Result<CreditCardInput, Box<dyn std::error::Error>> {
    Ok(CreditCardInput {
        balance: args
            .balance
            .ok_or("--balance is required (or provide --input)")?,
        apr: args.apr.ok_or("--apr is required (or provide --input)")?,
        min_payment_pct: args.min_pct,
        min_payment_floor: args.min_floor,
        fixed_payment: args.payment,
        extra_monthly: args.extra,
        max_months: args.max_months,
        target_months: args.target_months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan_args(kind: LoanKind) -> LoanArgs {
        LoanArgs {
            input: None,
            kind,
            amount: Some(dec!(20000)),
            home_price: Some(dec!(400000)),
            down_payment: dec!(80000),
            property_tax: dec!(4800),
            insurance: dec!(1200),
            hoa: Decimal::ZERO,
            pmi_rate: Decimal::ZERO,
            rate: Some(dec!(0.065)),
            term: Some(360),
            extra: Decimal::ZERO,
            start_date: None,
        }
    }

    #[test]
    fn test_mortgage_flags_use_price_less_down_payment() {
        let built = loan_from_flags(&loan_args(LoanKind::Mortgage)).unwrap();
        assert_eq!(built.amount, dec!(320000));
        assert!(matches!(built.loan_type, LoanType::Mortgage(_)));

        let out = loan::calculate_loan(&built).unwrap().result;
        assert_eq!(out.loan_amount, dec!(320000));
        assert_eq!(out.escrow.map(|e| e.total), Some(dec!(500)));
    }

    #[test]
    fn test_personal_flags() {
        let built = loan_from_flags(&loan_args(LoanKind::Personal)).unwrap();
        assert!(matches!(built.loan_type, LoanType::Personal));
        assert_eq!(built.amount, dec!(20000));
    }

    #[test]
    fn test_mortgage_requires_home_price() {
        let mut args = loan_args(LoanKind::Mortgage);
        args.home_price = None;
        let err = loan_from_flags(&args).unwrap_err();
        assert!(err.to_string().contains("--home-price"));
    }

    #[test]
    fn test_card_flags_carry_defaults() {
        let args = CreditCardArgs {
            input: None,
            balance: Some(dec!(3000)),
            apr: Some(dec!(0.2)),
            min_pct: dec!(0.03),
            min_floor: dec!(25),
            payment: None,
            extra: Decimal::ZERO,
            max_months: 360,
            target_months: Some(24),
        };
        let built = card_from_flags(&args).unwrap();
        let out = credit_card::calculate_credit_card_payoff(&built).unwrap().result;
        assert!(out.payment_for_target.is_some());
        assert_eq!(out.first_payment, dec!(90));
    }
}

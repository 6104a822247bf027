use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Policy types
// ---------------------------------------------------------------------------

/// Whether payments retire a debt or withdrawals drain an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Loan style: interest is a cost, principal = payment - interest.
    #[default]
    Amortizing,
    /// Account style: growth is credited, the whole withdrawal leaves the balance.
    Depleting,
}

/// A single extra amount applied in one specific period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeExtra {
    /// 1-indexed period in which the amount is applied.
    pub period: u32,
    pub amount: Money,
}

/// Source of withdrawal divisors, indexed by projection period.
///
/// Returning `None` means nothing is withdrawn in that period.
pub trait DivisorTable {
    fn divisor(&self, period: u32) -> Option<Decimal>;
}

/// Divisors resolved ahead of the projection, e.g. from an age-indexed
/// life-expectancy table.
///
/// Periods before `start_period` have no divisor. Periods past the end of
/// `divisors` reuse the last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisorSchedule {
    #[serde(default = "default_start_period")]
    pub start_period: u32,
    pub divisors: Vec<Decimal>,
}

fn default_start_period() -> u32 {
    1
}

impl DivisorSchedule {
    pub fn new(start_period: u32, divisors: Vec<Decimal>) -> Self {
        Self {
            start_period,
            divisors,
        }
    }
}

impl DivisorTable for DivisorSchedule {
    fn divisor(&self, period: u32) -> Option<Decimal> {
        if period < self.start_period {
            return None;
        }
        let idx = (period - self.start_period) as usize;
        self.divisors
            .get(idx)
            .or_else(|| self.divisors.last())
            .copied()
    }
}

/// How the base payment for each period is determined.
///
/// Selected once before the projection runs so the loop itself never
/// branches on calculator type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPolicy {
    /// A fixed payment every period.
    Scheduled { amount: Money },
    /// Level payment from the annuity formula over the full horizon.
    Annuity,
    /// Credit-card minimum: `max(balance * min_pct, floor_amount)`.
    MinimumPercentage { min_pct: Rate, floor_amount: Money },
    /// Required withdrawal: `balance / divisor(period)`.
    Divisor(DivisorSchedule),
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Immutable input to [`crate::projection::project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Starting balance.
    pub principal: Money,
    /// Rate per period, already divided down from the annual rate.
    pub periodic_rate: Rate,
    /// Maximum number of periods to project.
    pub horizon_periods: u32,
    pub payment: PaymentPolicy,
    /// Extra amount applied every period.
    #[serde(default)]
    pub extra_recurring: Money,
    #[serde(default)]
    pub extra_one_time: Option<OneTimeExtra>,
    #[serde(default)]
    pub direction: Direction,
}

impl AmortizationInput {
    /// Plain amortizing loan with an annuity payment and no extras.
    pub fn annuity(principal: Money, periodic_rate: Rate, horizon_periods: u32) -> Self {
        Self {
            principal,
            periodic_rate,
            horizon_periods,
            payment: PaymentPolicy::Annuity,
            extra_recurring: Decimal::ZERO,
            extra_one_time: None,
            direction: Direction::Amortizing,
        }
    }

    /// Total extra amount scheduled for `period`.
    pub fn extra_for(&self, period: u32) -> Money {
        let one_time = match self.extra_one_time {
            Some(extra) if extra.period == period => extra.amount,
            _ => Decimal::ZERO,
        };
        self.extra_recurring.saturating_add(one_time)
    }
}

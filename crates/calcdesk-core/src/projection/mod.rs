//! Balance projection engine shared by the lending and retirement calculators.
//!
//! A projection walks a balance forward one period at a time, charging
//! interest (or crediting growth), applying the period's payment and any
//! extra amounts, until the balance is settled or the horizon runs out.

pub mod engine;
pub mod policy;
pub mod validation;

pub use engine::{project, run_projection, LedgerEntry, ProjectionResult, BALANCE_EPSILON};
pub use policy::{
    AmortizationInput, Direction, DivisorSchedule, DivisorTable, OneTimeExtra, PaymentPolicy,
};
pub use validation::validate_amortization_input;

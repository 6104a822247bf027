use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentErrorInput {
    pub measured: Decimal,
    /// Accepted or theoretical value.
    pub actual: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentErrorOutput {
    pub absolute_error: Decimal,
    pub relative_error: Decimal,
    /// Signed: positive when the measurement overshoots.
    pub signed_percent_error: Decimal,
    pub percent_error: Decimal,
}

pub fn calculate_percent_error(
    input: &PercentErrorInput,
) -> CalcResult<ComputationOutput<PercentErrorOutput>> {
    let start = Instant::now();

    if input.actual.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "percent error (actual value is zero)".into(),
        });
    }

    let difference = input.measured - input.actual;
    let relative_error = difference.abs() / input.actual.abs();
    let signed = difference / input.actual.abs() * dec!(100);

    let output = PercentErrorOutput {
        absolute_error: difference.abs(),
        relative_error,
        signed_percent_error: signed,
        percent_error: relative_error * dec!(100),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "|measured - actual| / |actual| x 100",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

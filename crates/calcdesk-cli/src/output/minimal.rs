use serde_json::Value;

use super::{format_scalar, result_object};

/// Headline field for each calculator, in priority order.
const PRIORITY_KEYS: [&str; 16] = [
    "total_monthly_payment",
    "monthly_payment",
    "months_to_payoff",
    "current_year_rmd",
    "future_value",
    "goal_calories",
    "final_balance",
    "exponent_form",
    "equation",
    "percent_error",
    "surface_area",
    "momentum",
    "gamma",
    "momentum_gev",
    "partition_function",
    "rms",
];

/// Print just the key answer value from the output.
///
/// Looks for a known headline field first, then falls back to the first
/// non-null field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let Some(result) = result_object(value) else {
        return format_scalar(value.get("result").unwrap_or(value));
    };

    let headline = PRIORITY_KEYS
        .iter()
        .filter_map(|key| result.get(*key))
        .find(|val| !val.is_null());
    if let Some(val) = headline {
        return format_scalar(val);
    }

    match result.iter().find(|(_, val)| !val.is_null()) {
        Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
        None => String::new(),
    }
}

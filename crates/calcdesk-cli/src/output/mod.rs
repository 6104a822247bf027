pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Result fields that hold one row per period or year.
const SCHEDULE_KEYS: [&str; 4] = ["schedule", "ledger", "projection", "year_by_year"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of an envelope, unwrapping a single-variant enum
/// such as `{"Collision": {...}}` so its fields sit at the top level.
pub(crate) fn result_object(value: &Value) -> Option<&Map<String, Value>> {
    let mut current = value.get("result")?;
    loop {
        let map = current.as_object()?;
        match map.iter().next() {
            Some((_, inner)) if map.len() == 1 && inner.is_object() => current = inner,
            _ => return Some(map),
        }
    }
}

/// The per-period rows carried by a result, if any.
pub(crate) fn schedule_rows(result: &Map<String, Value>) -> Option<(&'static str, &Vec<Value>)> {
    SCHEDULE_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) if rows.first().is_some_and(Value::is_object) => {
            Some((*key, rows))
        }
        _ => None,
    })
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_object_unwraps_enum_variant() {
        let envelope = json!({"result": {"Single": {"momentum": 6.0}}});
        let result = result_object(&envelope).unwrap();
        assert_eq!(result.get("momentum"), Some(&json!(6.0)));
    }

    #[test]
    fn test_result_object_keeps_plain_struct() {
        let envelope = json!({"result": {"slope": "2", "distance": "5"}});
        assert_eq!(result_object(&envelope).unwrap().len(), 2);
    }

    #[test]
    fn test_schedule_rows_prefers_row_arrays() {
        let result = json!({"factors": [2, 3], "ledger": [{"period": 1}]});
        let (key, rows) = schedule_rows(result.as_object().unwrap()).unwrap();
        assert_eq!(key, "ledger");
        assert_eq!(rows.len(), 1);

        let no_rows = json!({"factors": [2, 3]});
        assert!(schedule_rows(no_rows.as_object().unwrap()).is_none());
    }
}

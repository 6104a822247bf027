use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_object, schedule_rows};

/// Format output as tables: a field/value summary, then any schedule.
pub fn print_table(value: &Value) {
    let Some(result) = result_object(value) else {
        if let Value::Object(map) = value {
            println!("{}", summary_table(map, None));
        } else {
            println!("{}", value);
        }
        return;
    };

    let schedule = schedule_rows(result);
    println!("{}", summary_table(result, schedule.map(|(key, _)| key)));

    if let Some((key, rows)) = schedule {
        println!("\n{}:", key);
        println!("{}", rows_table(rows));
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn summary_table(map: &Map<String, Value>, skip: Option<&str>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map.iter().filter(|(k, _)| Some(k.as_str()) != skip) {
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    builder.build()
}

fn rows_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();
    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        builder.push_record(headers.clone());
        for row in rows.iter().filter_map(Value::as_object) {
            let record: Vec<String> = headers
                .iter()
                .map(|h| row.get(h).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    builder.build()
}

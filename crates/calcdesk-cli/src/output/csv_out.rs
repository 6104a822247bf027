use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{format_scalar, result_object, schedule_rows};

/// Write output as CSV to stdout.
///
/// Results that carry a schedule are written one row per period; everything
/// else becomes a two-column `field,value` listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match result_object(value) {
        Some(result) => match schedule_rows(result) {
            Some((_, rows)) => write_rows(&mut wtr, rows)?,
            None => write_fields(&mut wtr, result)?,
        },
        None => match value {
            Value::Object(map) => write_fields(&mut wtr, map)?,
            other => wtr.write_record([format_scalar(other)])?,
        },
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_scalar(val)])?;
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_written_as_rows() {
        let envelope = json!({
            "result": {
                "monthly_payment": "299.71",
                "schedule": [
                    {"period": 1, "payment": "299.71", "balance": "9741.96"},
                    {"period": 2, "payment": "299.71", "balance": "9482.84"}
                ]
            }
        });
        let csv = render(&envelope);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("period"));
        assert!(lines[2].starts_with('2'));
    }

    #[test]
    fn test_summary_written_as_fields() {
        let envelope = json!({"result": {"percent_error": "5", "absolute_error": "0.5"}});
        let csv = render(&envelope);
        assert!(csv.starts_with("field,value"));
        assert_eq!(csv.lines().count(), 3);
    }
}

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse a JSON input file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let path = Path::new(path);
    if !path.is_file() {
        return Err(format!("input file not found: {}", path.display()).into());
    }

    let file = File::open(path)
        .map_err(|e| format!("failed to open '{}': {}", path.display(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("'{}': {}", path.display(), describe(&e)).into())
}

/// Distinguish malformed JSON from well-formed JSON of the wrong shape.
pub fn describe(e: &serde_json::Error) -> String {
    match e.classify() {
        Category::Data => format!("input does not match the calculator's fields ({e})"),
        Category::Syntax | Category::Eof => format!("invalid JSON ({e})"),
        Category::Io => e.to_string(),
    }
}

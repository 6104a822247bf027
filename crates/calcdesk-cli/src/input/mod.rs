pub mod file;
pub mod stdin;

use log::debug;
use serde::de::DeserializeOwned;

/// Load a typed input from `--input <file>`, falling back to piped stdin.
///
/// Returns `None` when neither is available so the caller can build the
/// input from flags instead.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        debug!("reading input from {path}");
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => serde_json::from_value(data)
            .map(Some)
            .map_err(|e| format!("stdin: {}", file::describe(&e)).into()),
        None => Ok(None),
    }
}

/// Like [`load`], for commands that have no flag-based form.
pub fn require<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    load(path)?.ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}

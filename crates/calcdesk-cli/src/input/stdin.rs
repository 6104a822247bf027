use serde_json::Value;
use std::io::{self, Read};

use super::file::describe;

/// JSON piped on stdin, or `None` when stdin is a terminal or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&buffer)
        .map(Some)
        .map_err(|e| format!("stdin: {}", describe(&e)).into())
}

//! JSON file input and stdout output for the CLI

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads and deserializes a JSON file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("Invalid JSON in '{}': {}", path.display(), e)))
}

/// Writes a pretty-printed JSON value to stdout
pub fn write_response(data: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, data)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Writes an error object to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

//! Resilient JSONL reading.

use crate::error::Result;
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Read a JSONL file, skipping lines that fail to parse.
///
/// Each non-blank line is deserialized as one `T`. Lines that are not valid
/// JSON, or that do not match `T`'s shape, are skipped and reported as
/// [`Warning::MalformedJson`] with their 1-based line number. Blank lines are
/// ignored silently (the file ends with a trailing newline by convention).
///
/// Returns the successfully parsed records in file order together with the
/// collected warnings.
///
/// # Errors
///
/// Fails only when the file itself cannot be opened or read; individual bad
/// lines never fail the load.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let mut lines = BufReader::new(file).lines();

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(trimmed) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "skipping malformed JSONL line");
                warnings.push(Warning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok((records, warnings))
}

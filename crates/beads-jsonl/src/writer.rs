//! Atomic JSONL writing.

use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Atomically write records to a JSONL file, one JSON object per line.
///
/// The data is written to a sibling `.tmp` file which is then renamed over
/// the target path. Renames within one filesystem are atomic on POSIX, so an
/// interrupted write leaves the previous file contents intact; at worst a
/// stale `.tmp` file is left behind and overwritten by the next save.
///
/// # Errors
///
/// Returns an error if the temp file cannot be created, a record fails to
/// serialize, or the final rename fails. The target file is unchanged in all
/// of these cases.
pub async fn write_jsonl_atomic<T, P>(path: P, records: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    let file = File::create(&temp_path).await?;
    let mut writer = BufWriter::new(file);

    for record in records {
        let json = serde_json::to_string(record)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");

        let records = vec![
            Record {
                id: 1,
                name: "a".to_string(),
            },
            Record {
                id: 2,
                name: "b".to_string(),
            },
        ];

        write_jsonl_atomic(&path, &records).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");

        std::fs::write(&path, "stale content\n").unwrap();

        let records = vec![Record {
            id: 7,
            name: "fresh".to_string(),
        }];
        write_jsonl_atomic(&path, &records).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("fresh"));
        assert!(!content.contains("stale"));
    }

    #[tokio::test]
    async fn empty_slice_produces_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");

        write_jsonl_atomic::<Record, _>(&path, &[]).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn no_temp_file_left_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");

        let records = vec![Record {
            id: 1,
            name: "a".to_string(),
        }];
        write_jsonl_atomic(&path, &records).await.unwrap();

        assert!(!path.with_extension("tmp").exists());
    }
}

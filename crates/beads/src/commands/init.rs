//! Implementation of the `init` command.
//!
//! Creates the `.beads/` directory with configuration and an empty issues
//! file.

use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default issue prefix if none specified.
pub const DEFAULT_PREFIX: &str = "beads";

/// Name of the beads directory.
pub const BEADS_DIR_NAME: &str = ".beads";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the issues data file.
pub const ISSUES_FILE_NAME: &str = "issues.jsonl";

/// Minimum prefix length.
pub const MIN_PREFIX_LENGTH: usize = 2;

/// Maximum prefix length.
pub const MAX_PREFIX_LENGTH: usize = 20;

/// Maximum directory depth to traverse when searching for the beads root.
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeadsConfig {
    /// Issue ID prefix (e.g., "beads" for "beads-1").
    #[serde(rename = "issue-prefix")]
    pub issue_prefix: String,

    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("jsonl" for in-memory with JSONL persistence).
    pub backend: String,

    /// Path to the data file, relative to the repository root.
    pub data_file: String,
}

impl StorageConfig {
    /// Resolve the configured backend against the repository root.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(Error::Config(format!("Unknown storage backend: {other}"))),
        }
    }
}

impl BeadsConfig {
    /// Create a new configuration with the given prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            issue_prefix: prefix.to_string(),
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{BEADS_DIR_NAME}/{ISSUES_FILE_NAME}"),
            },
        }
    }

    /// Load configuration from a file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for BeadsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Result of the init command.
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created beads directory.
    pub beads_dir: PathBuf,
    /// Path to the created config file.
    pub config_file: PathBuf,
    /// Path to the created issues file.
    pub issues_file: PathBuf,
    /// The prefix used for issue IDs.
    pub prefix: String,
}

/// Validate issue ID prefix format: 2-20 alphanumeric characters.
///
/// Expects pre-trimmed input.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.len() < MIN_PREFIX_LENGTH {
        return Err(Error::Config(format!(
            "Prefix must be at least {MIN_PREFIX_LENGTH} characters"
        )));
    }

    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(Error::Config(format!(
            "Prefix cannot exceed {MAX_PREFIX_LENGTH} characters"
        )));
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::Config(
            "Prefix must contain only alphanumeric characters".to_string(),
        ));
    }

    Ok(())
}

/// Initialize a new beads repository in the given directory.
///
/// # Errors
///
/// Fails when `.beads/` already exists, the prefix is invalid, or file
/// system operations fail.
pub async fn init(base_dir: &Path, prefix: Option<&str>) -> Result<InitResult> {
    let prefix = prefix.unwrap_or(DEFAULT_PREFIX).trim();
    validate_prefix(prefix)?;

    let beads_dir = base_dir.join(BEADS_DIR_NAME);

    if beads_dir.exists() {
        return Err(Error::Config(format!(
            "Beads is already initialized in this directory. Found existing '{BEADS_DIR_NAME}'"
        )));
    }

    fs::create_dir_all(&beads_dir).await?;

    let config_file = beads_dir.join(CONFIG_FILE_NAME);
    let config = BeadsConfig::new(prefix);
    config.save(&config_file).await?;

    let issues_file = beads_dir.join(ISSUES_FILE_NAME);
    fs::write(&issues_file, "").await?;

    Ok(InitResult {
        beads_dir,
        config_file,
        issues_file,
        prefix: prefix.to_string(),
    })
}

/// Find the beads root by searching up the directory tree.
///
/// Returns the directory containing `.beads/`, or `None` if nothing is
/// found within the traversal depth limit.
pub fn find_beads_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(BEADS_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::valid_short("ab")]
    #[case::valid_medium("beads")]
    #[case::valid_alphanumeric("test123")]
    #[case::valid_uppercase("PROJ")]
    #[case::valid_max_length("a1b2c3d4e5f6g7h8i9j0")]
    fn validate_prefix_valid(#[case] prefix: &str) {
        assert!(validate_prefix(prefix).is_ok());
    }

    #[rstest]
    #[case::too_short("a", "at least 2")]
    #[case::empty("", "at least 2")]
    #[case::too_long("a".repeat(21), "cannot exceed 20")]
    #[case::hyphen("my-proj", "alphanumeric")]
    #[case::space("my proj", "alphanumeric")]
    fn validate_prefix_invalid(#[case] prefix: impl AsRef<str>, #[case] expected: &str) {
        let result = validate_prefix(prefix.as_ref());
        let err = result.expect_err("expected invalid prefix").to_string();
        assert!(
            err.to_lowercase().contains(&expected.to_lowercase()),
            "error '{err}' should contain '{expected}'"
        );
    }

    #[tokio::test]
    async fn config_round_trips_through_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let original = BeadsConfig::new("test123");
        original.save(&config_path).await.unwrap();

        let loaded = BeadsConfig::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(content.contains("issue-prefix: test123"));
        assert!(content.contains("backend: jsonl"));
    }

    #[tokio::test]
    async fn init_creates_directory_structure() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), Some("myproj")).await.unwrap();

        assert!(result.beads_dir.exists());
        assert!(result.config_file.exists());
        assert!(result.issues_file.exists());
        assert_eq!(result.prefix, "myproj");

        let content = tokio::fs::read_to_string(&result.issues_file)
            .await
            .unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn init_uses_default_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let result = init(temp_dir.path(), None).await.unwrap();
        assert_eq!(result.prefix, DEFAULT_PREFIX);
    }

    #[tokio::test]
    async fn init_fails_if_already_initialized() {
        let temp_dir = TempDir::new().unwrap();

        init(temp_dir.path(), None).await.unwrap();
        let result = init(temp_dir.path(), None).await;

        let err = result.expect_err("second init must fail").to_string();
        assert!(err.to_lowercase().contains("already initialized"));
    }

    #[tokio::test]
    async fn init_rejects_invalid_prefix() {
        let temp_dir = TempDir::new().unwrap();
        assert!(init(temp_dir.path(), Some("a")).await.is_err());
    }

    #[test]
    fn find_beads_root_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(BEADS_DIR_NAME)).unwrap();

        let sub_dir = temp_dir.path().join("src").join("nested");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let found = find_beads_root(&sub_dir);
        assert_eq!(found, Some(temp_dir.path().to_path_buf()));
    }

    #[test]
    fn find_beads_root_not_found() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_beads_root(temp_dir.path()).is_none());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let config = StorageConfig {
            backend: "postgres".to_string(),
            data_file: "x.jsonl".to_string(),
        };
        assert!(config.to_backend(Path::new("/tmp")).is_err());
    }
}

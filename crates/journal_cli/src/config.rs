//! Configuration management

use crate::error::CliError;
use journal_core::DEFAULT_DB_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "journal.toml";
pub const DB_ENV_VAR: &str = "JOURNAL_DB";

/// Contents of `journal.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    /// File logging is enabled only when this is set.
    pub log_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl JournalConfig {
    /// Loads `explicit`, else `./journal.toml` when present, else defaults.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Database path precedence: `--db` flag, `JOURNAL_DB`, config, default.
    pub fn resolve_db_path(&self, flag: Option<&Path>) -> PathBuf {
        self.resolve_db_path_with_env(flag, std::env::var_os(DB_ENV_VAR).map(PathBuf::from))
    }

    fn resolve_db_path_with_env(&self, flag: Option<&Path>, env: Option<PathBuf>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or(env.filter(|path| !path.as_os_str().is_empty()))
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME))
    }

    pub fn resolve_export_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "db_path = \"data/my.db\"\nlog_level = \"debug\"\nlog_dir = \"/tmp/journal-logs\"\nexport_dir = \"exports\"\n",
        )
        .unwrap();

        let config = JournalConfig::load(Some(&path)).unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("data/my.db")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/journal-logs")));
        assert_eq!(config.export_dir, Some(PathBuf::from("exports")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "database = \"x.db\"\n").unwrap();

        let err = JournalConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = JournalConfig::load(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_db_path_precedence() {
        let config = JournalConfig {
            db_path: Some(PathBuf::from("from-config.db")),
            ..JournalConfig::default()
        };

        assert_eq!(
            config.resolve_db_path_with_env(
                Some(Path::new("from-flag.db")),
                Some(PathBuf::from("from-env.db"))
            ),
            PathBuf::from("from-flag.db")
        );
        assert_eq!(
            config.resolve_db_path_with_env(None, Some(PathBuf::from("from-env.db"))),
            PathBuf::from("from-env.db")
        );
        assert_eq!(
            config.resolve_db_path_with_env(None, None),
            PathBuf::from("from-config.db")
        );
        assert_eq!(
            JournalConfig::default().resolve_db_path_with_env(None, None),
            PathBuf::from("journal.db")
        );
    }
}

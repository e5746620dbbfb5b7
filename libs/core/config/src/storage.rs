use crate::{env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

pub const DEFAULT_TASKS_STORE_PATH: &str = "data/tasks.json";

/// Where the task snapshot lives on disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub tasks_path: PathBuf,
}

impl StorageConfig {
    pub fn new(tasks_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
        }
    }
}

impl FromEnv for StorageConfig {
    /// Reads TASKS_STORE_PATH, defaulting to `data/tasks.json`
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("TASKS_STORE_PATH", DEFAULT_TASKS_STORE_PATH);
        if raw.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "TASKS_STORE_PATH".to_string(),
                details: "path cannot be empty".to_string(),
            });
        }

        Ok(Self::new(raw))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TASKS_STORE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_default_path() {
        temp_env::with_var_unset("TASKS_STORE_PATH", || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.tasks_path, PathBuf::from("data/tasks.json"));
        });
    }

    #[test]
    fn test_storage_config_custom_path() {
        temp_env::with_var("TASKS_STORE_PATH", Some("/tmp/taskflow.json"), || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.tasks_path, PathBuf::from("/tmp/taskflow.json"));
        });
    }

    #[test]
    fn test_storage_config_rejects_blank_path() {
        temp_env::with_var("TASKS_STORE_PATH", Some("   "), || {
            let err = StorageConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("TASKS_STORE_PATH"));
        });
    }
}

use core_config::{app_info, server::ServerConfig, storage::StorageConfig, AppInfo, FromEnv};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=3001
        let storage = StorageConfig::from_env()?; // TASKS_STORE_PATH, default data/tasks.json

        Ok(Self {
            app: app_info!(),
            server,
            storage,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(["PORT", "HOST", "TASKS_STORE_PATH", "APP_ENV"], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.server.port, 3001);
            assert_eq!(config.app.name, "taskflow_api");
            assert_eq!(
                config.storage.tasks_path,
                std::path::PathBuf::from("data/tasks.json")
            );
        });
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        temp_env::with_var("PORT", Some("not-a-port"), || {
            assert!(Config::from_env().is_err());
        });
    }
}

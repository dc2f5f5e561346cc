//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file plus `DOCVAULT__`-prefixed environment variables.
//! Every field carries a default, so an empty configuration is valid.

pub mod activity;
pub mod app;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::activity::ActivityConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::storage::{StorageConfig, UploadConflictPolicy};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage root settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Activity feed settings.
    #[serde(default)]
    pub activity: ActivityConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default.toml` (optional), the file at `config_path` (required
    /// when given), and environment variables such as
    /// `DOCVAULT__STORAGE__ROOT_PATH`.
    pub fn load(config_path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DOCVAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no component can work with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage.root_path.trim().is_empty() {
            return Err(AppError::configuration("storage.root_path must not be empty"));
        }
        if self.storage.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "storage.max_upload_size_bytes must be greater than zero",
            ));
        }
        if self.activity.capacity == 0 {
            return Err(AppError::configuration(
                "activity.capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.upload_conflict, UploadConflictPolicy::Reject);
        assert_eq!(config.storage.index_file(), Some("./data/index.json"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[storage]
root_path = "/srv/docvault"
index_file = ""
upload_conflict = "overwrite"

[logging]
format = "json"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.root_path, "/srv/docvault");
        assert_eq!(config.storage.index_file(), None);
        assert_eq!(
            config.storage.upload_conflict,
            UploadConflictPolicy::Overwrite
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.activity.capacity, 500);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut config = AppConfig::default();
        config.activity.capacity = 0;
        assert!(config.validate().is_err());
    }
}

//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use meridian_core::MeridianError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Environment variable selecting the `config/{env}.toml` overlay.
pub const ENVIRONMENT_VAR: &str = "MERIDIAN_ENV";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. Built-in defaults
    /// 2. `config/default.toml`
    /// 3. `config/{MERIDIAN_ENV}.toml`
    /// 4. `config/local.toml`
    /// 5. Environment variables such as `MERIDIAN__REDIS__URL`
    pub fn new(config_dir: impl Into<String>) -> Result<Self, MeridianError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, MeridianError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), MeridianError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, MeridianError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let defaults = Config::try_from(&AppConfig::default()).map_err(config_error)?;
        let mut builder = Config::builder().add_source(defaults);

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config file: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MERIDIAN")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize::<AppConfig>())
            .map_err(config_error)?;

        if app_config.app.environment == "production"
            && app_config.security.jwt_secret.starts_with("change-me")
        {
            warn!("Using a placeholder JWT secret in production");
        }

        ConfigValidator::validate(&app_config)
            .map_err(|errors| MeridianError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error(err: ConfigError) -> MeridianError {
    MeridianError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[tokio::test]
    async fn test_loads_default_toml_over_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            format!(
                "[security]\njwt_secret = \"{SECRET}\"\n\n[redis]\nurl = \"redis://cache:6379/3\"\n"
            ),
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        let config = loader.get().await;

        assert_eq!(config.security.jwt_secret, SECRET);
        assert_eq!(config.redis.url, "redis://cache:6379/3");
        // untouched keys keep their built-in values
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.jwt_expiration_secs, 3600);
    }

    #[tokio::test]
    async fn test_local_toml_overrides_default_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            format!("[security]\njwt_secret = \"{SECRET}\"\n\n[server]\nport = 4000\n"),
        )
        .unwrap();
        fs::write(dir.path().join("local.toml"), "[server]\nport = 5000\n").unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        assert_eq!(loader.get().await.server.port, 5000);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[security]\njwt_secret = \"short\"\n").unwrap();

        match ConfigLoader::new(dir.path().to_string_lossy()) {
            Err(MeridianError::Configuration(msg)) => assert!(msg.contains("JWT secret too short")),
            Err(other) => panic!("Expected Configuration error, got {:?}", other),
            Ok(_) => panic!("Expected Configuration error"),
        }
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        fs::write(&path, format!("[security]\njwt_secret = \"{SECRET}\"\n")).unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        assert_eq!(loader.get().await.server.port, 3000);

        fs::write(
            &path,
            format!("[security]\njwt_secret = \"{SECRET}\"\n\n[server]\nport = 3100\n"),
        )
        .unwrap();
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.server.port, 3100);
    }
}

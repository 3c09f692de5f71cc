use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CRITICAL_DAYS: u64 = 3;
const DEFAULT_FORECAST_HORIZON_DAYS: u64 = 7;
const MAX_FORECAST_HORIZON_DAYS: u64 = 90;
const CONFIG_DIR: &str = "config";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base address of the inventory store
    #[serde(default = "default_api_base_url")]
    #[validate(url)]
    pub api_base_url: String,

    /// Per-request timeout in seconds; unset leaves the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Items with this many days of stock or fewer count as critical on the dashboard
    #[serde(default = "default_critical_days")]
    pub critical_days: u64,

    /// Number of days covered by the analytics depletion outlook
    #[serde(default = "default_forecast_horizon_days")]
    pub forecast_horizon_days: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            critical_days: default_critical_days(),
            forecast_horizon_days: default_forecast_horizon_days(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEFAULT_ENV
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.request_timeout_secs == Some(0) {
            let mut err = ValidationError::new("request_timeout_zero");
            err.message = Some(
                "request_timeout_secs must be at least 1; leave it unset for the transport default"
                    .into(),
            );
            errors.add("request_timeout_secs", err);
        }

        if self.forecast_horizon_days == 0 || self.forecast_horizon_days > MAX_FORECAST_HORIZON_DAYS {
            let mut err = ValidationError::new("forecast_horizon_range");
            err.message = Some("forecast_horizon_days must be between 1 and 90".into());
            errors.add("forecast_horizon_days", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_critical_days() -> u64 {
    DEFAULT_CRITICAL_DAYS
}

fn default_forecast_horizon_days() -> u64 {
    DEFAULT_FORECAST_HORIZON_DAYS
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => {
            let mut err = ValidationError::new("log_level");
            err.message = Some("log_level must be one of trace, debug, info, warn, error".into());
            Err(err)
        }
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("kitchen_inventory={},kitchen_inventory_cli={}", level, level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Loads configuration from `dir`, using `profile` to pick the environment file.
pub fn load_config_from(dir: &Path, profile: &str) -> Result<AppConfig, AppConfigError> {
    let config = Config::builder()
        .set_default("api_base_url", DEFAULT_API_BASE_URL)?
        .set_default("environment", profile)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(profile).to_string_lossy()).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration constraint check failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!(api_base_url = %app_config.api_base_url, "Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn defaults_apply_without_files() {
        let dir = config_dir(&[]);
        let cfg = load_config_from(dir.path(), "development").unwrap();

        assert_eq!(cfg.api_base_url, "http://localhost:8000");
        assert_eq!(cfg.request_timeout(), None);
        assert_eq!(cfg.critical_days, 3);
        assert_eq!(cfg.forecast_horizon_days, 7);
        assert!(cfg.is_development());
    }

    #[test]
    fn profile_file_overrides_default_file() {
        let dir = config_dir(&[
            (
                "default.toml",
                "api_base_url = \"http://inventory.local:8000\"\nlog_level = \"debug\"\n",
            ),
            (
                "staging.toml",
                "api_base_url = \"https://staging.example.com\"\nrequest_timeout_secs = 5\n",
            ),
        ]);
        let cfg = load_config_from(dir.path(), "staging").unwrap();

        assert_eq!(cfg.api_base_url, "https://staging.example.com");
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.environment, "staging");
    }

    #[test]
    fn invalid_values_fail_validation() {
        let dir = config_dir(&[(
            "default.toml",
            "api_base_url = \"not a url\"\nlog_level = \"loud\"\n",
        )]);
        let result = load_config_from(dir.path(), "development");

        match result {
            Err(AppConfigError::Validation(errors)) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("api_base_url"));
                assert!(fields.contains_key("log_level"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn zero_timeout_and_empty_horizon_are_rejected() {
        let dir = config_dir(&[(
            "default.toml",
            "request_timeout_secs = 0\nforecast_horizon_days = 0\n",
        )]);
        match load_config_from(dir.path(), "development") {
            Err(AppConfigError::Validation(errors)) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("request_timeout_secs"));
                assert!(fields.contains_key("forecast_horizon_days"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = config_dir(&[("default.toml", "jwt_secret = \"nope\"\n")]);
        assert!(matches!(
            load_config_from(dir.path(), "development"),
            Err(AppConfigError::Load(_))
        ));
    }
}

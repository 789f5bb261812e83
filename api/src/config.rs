//! Configuration loading
//!
//! Layers, lowest precedence first:
//! 1. Section defaults of [`AppConfig`]
//! 2. Optional TOML file (`SMS_CONFIG_FILE`, default `etc/sms.toml`)
//! 3. Environment variables prefixed `SMS__`, e.g. `SMS__REDIS__URL`
//!
//! The environment's `.env.<env>` file and then `.env` are read first, so
//! their variables take part in step 3.

use std::env;

use config::{Config, Environment as EnvSource, File, FileFormat};
use sms_shared::config::{AppConfig, Environment};
use thiserror::Error;

pub const CONFIG_FILE_VAR: &str = "SMS_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "etc/sms.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load the application configuration for the current environment
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let path = env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    load_from(&path)
}

/// Load configuration from `path` (if present) overlaid with `SMS__` variables
pub fn load_from(path: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            EnvSource::with_prefix("SMS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<AppConfig>()?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.redis.url.is_empty() {
        return Err(ConfigError::Invalid("redis.url must be set".to_string()));
    }
    if config.sms.rate_limit.max_attempts == 0 {
        return Err(ConfigError::Invalid(
            "sms.rate_limit.max_attempts must be positive".to_string(),
        ));
    }
    if config.sms.token_ttl_seconds == 0 || config.sms.request_ttl_seconds == 0 {
        return Err(ConfigError::Invalid("sms TTLs must be positive".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, contents: &str) -> String {
        let path = env::temp_dir().join(format!("sms-api-{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_from("/nonexistent/sms.toml").unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.sms.default_provider, "Sinch");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_config(
            "override",
            r#"
[server]
port = 9090

[sms]
default_provider = "Zenvia"

[sms.rate_limit]
cooldown_seconds = 30
"#,
        );
        let config = load_from(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.sms.default_provider, "Zenvia");
        assert_eq!(config.sms.rate_limit.cooldown_seconds, 30);
        assert_eq!(config.sms.rate_limit.max_attempts, 5);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let path = write_config("zero", "[sms.rate_limit]\nmax_attempts = 0\n");
        let result = load_from(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        std::fs::remove_file(path).ok();
    }
}

//! # configs
//!
//! Runtime settings for the air-quality alert client.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. a TOML file (`aqi-alert.toml` in the working directory, or an explicit path)
//! 3. `AQI_ALERT__*` environment variables, `__` separating nested keys
//!    (`AQI_ALERT__CREDENTIALS__PASSWORD`)
//!
//! `.env` is loaded into the process environment before anything else.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8080/api/auth";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

const ENV_PREFIX: &str = "AQI_ALERT";
const DEFAULT_FILE: &str = "aqi-alert";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth_base_url: String,
    pub api_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub credentials: CredentialSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialSettings {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub password: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_filter() -> String {
    "info".to_string()
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Settings {
    /// Hydrate `.env`, then read `aqi-alert.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        hydrate_env_file()?;
        Self::load_from(None)
    }

    /// Like [`Settings::load`] without touching `.env`. `path` replaces the default file
    /// lookup; a missing file is only an error when the path was given explicitly.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_FILE).format(FileFormat::Toml).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("auth_base_url", DEFAULT_AUTH_BASE_URL)?
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!(
            auth = %settings.auth_base_url,
            api = %settings.api_base_url,
            timeout_secs = ?settings.request_timeout_secs,
            "settings loaded"
        );
        Ok(settings)
    }

    /// `None` leaves the transport on its own default.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("auth_base_url", &self.auth_base_url), ("api_base_url", &self.api_base_url)] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    key,
                    value: value.clone(),
                });
            }
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn hydrate_env_file() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigError::Dotenv { source: err }),
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read .env: {source}")]
    Dotenv {
        #[source]
        source: dotenvy::Error,
    },
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("`{key}` must be an http(s) URL, got `{value}`")]
    InvalidUrl { key: &'static str, value: String },
    #[error("`request_timeout_secs` must be greater than zero")]
    ZeroTimeout,
}

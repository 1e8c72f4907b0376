// ============================
// identity-core/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "identity.toml";
/// Prefix for environment overrides, e.g. `IDENTITY_EMAIL_DOMAIN`
pub const ENV_PREFIX: &str = "IDENTITY_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Identity core settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Only addresses at this domain may register
    pub email_domain: String,
    /// Root directory of the flat-file repository
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            email_domain: "capita.co.uk".to_string(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `identity.toml`, then `IDENTITY_*` env vars
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load settings with an explicit config file. `.json` files are read
    /// as JSON, anything else as TOML.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        let figment = if path.extension().is_some_and(|ext| ext == "json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };

        let settings: Settings = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the core cannot run with
    pub fn validate(&self) -> std::result::Result<(), IdentityError> {
        let domain = self.email_domain.trim();
        if domain.is_empty() {
            return Err(IdentityError::Config("email_domain must not be empty".to_string()));
        }
        if domain.contains('@') {
            return Err(IdentityError::Config(format!(
                "email_domain must be a bare domain, got {domain:?}"
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(IdentityError::Config(format!(
                "unknown log_level {:?}",
                self.log_level
            )));
        }
        Ok(())
    }
}

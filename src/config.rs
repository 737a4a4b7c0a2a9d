//! Runtime configuration.
//!
//! Settings come from an optional JSON file named by the
//! `CAREPORTAL_CONFIG` environment variable; everything has a default
//! so the portal runs with no file at all (demo credentials, store
//! under the home directory).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::credentials::{CredentialError, CredentialSet};

/// Application-level constants
pub const APP_NAME: &str = "Careportal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the config file to load.
pub const CONFIG_ENV: &str = "CAREPORTAL_CONFIG";

pub fn default_log_filter() -> &'static str {
    "info,tower_http=info"
}

/// Get the application data directory
/// ~/Careportal/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Careportal")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Portal settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// SQLite file; defaults to portal.db under the data directory.
    pub database_file: Option<PathBuf>,
    /// Credentials file; the built-in demo set is used when absent.
    pub credentials_file: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            database_file: None,
            credentials_file: None,
        }
    }
}

impl PortalConfig {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Settings from the file named by `CAREPORTAL_CONFIG`, or the
    /// defaults when the variable is unset.
    pub fn load_default() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_file
            .clone()
            .unwrap_or_else(|| app_data_dir().join("portal.db"))
    }

    /// The credential set this deployment authenticates against.
    pub fn credential_set(&self) -> Result<CredentialSet, CredentialError> {
        match &self.credentials_file {
            Some(path) => CredentialSet::load(path),
            None => Ok(CredentialSet::demo()),
        }
    }
}

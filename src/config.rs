use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

pub const DEFAULT_API_URL: &str = "https://api.transip.nl/v6";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Provider settings, as found in the host's JSON configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TransipConfig {
    pub account_name: String,
    pub private_key_path: PathBuf,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Whether the key may be used from any IP address rather than only
    /// from whitelisted ones.
    #[serde(default)]
    pub global_key: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl TransipConfig {
    pub fn new(account_name: impl Into<String>, private_key_path: impl Into<PathBuf>) -> Self {
        Self {
            account_name: account_name.into(),
            private_key_path: private_key_path.into(),
            api_url: default_api_url(),
            global_key: false,
            read_only: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_env() -> Result<Self, Error> {
        let required = |key: &str| {
            env::var(key).map_err(|e| Error::Config(format!("{key}: {e}")))
        };
        let flag = |key: &str| {
            env::var(key)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        Ok(TransipConfig {
            account_name: required("TRANSIP_ACCOUNT_NAME")?,
            private_key_path: required("TRANSIP_PRIVATE_KEY_PATH")?.into(),
            api_url: env::var("TRANSIP_API_URL").unwrap_or_else(|_| default_api_url()),
            global_key: flag("TRANSIP_GLOBAL_KEY"),
            read_only: flag("TRANSIP_READ_ONLY"),
            request_timeout: env::var("TRANSIP_REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

use std::time::Duration;

use serde::Deserialize;

use crate::services::poller::PollPolicy;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// FASHN API key. Absent or blank ⇒ forced demo mode.
    #[serde(default)]
    pub fashn_api_key: Option<String>,

    /// FASHN API base URL (overridable for staging/self-hosted gateways).
    #[serde(default = "default_fashn_base_url")]
    pub fashn_base_url: String,

    /// Timeout for the best-effort reference-image reachability probe.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Seconds between provider status checks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Hard ceiling on status checks before a job is declared timed out.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// S3-compatible image store. All five settings must be present for
    /// persistence to be enabled; otherwise inline payloads are kept as-is.
    #[serde(default)]
    pub store_bucket: Option<String>,

    #[serde(default)]
    pub store_endpoint: Option<String>,

    #[serde(default)]
    pub store_access_key: Option<String>,

    #[serde(default)]
    pub store_secret_key: Option<String>,

    /// Public base URL under which stored objects are served.
    #[serde(default)]
    pub store_public_url: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_fashn_base_url() -> String {
    "https://api.fashn.ai".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_poll_max_attempts() -> u32 {
    60
}

/// Settings for the S3-compatible image store, present only when fully
/// configured.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub bucket: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// The provider credential, treating a blank key as unconfigured.
    pub fn fashn_credential(&self) -> Option<&str> {
        self.fashn_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_attempts: self.poll_max_attempts,
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn store_settings(&self) -> Option<StoreSettings> {
        Some(StoreSettings {
            bucket: self.store_bucket.clone()?,
            endpoint: self.store_endpoint.clone()?,
            access_key: self.store_access_key.clone()?,
            secret_key: self.store_secret_key.clone()?,
            public_url: self.store_public_url.clone()?,
        })
    }
}

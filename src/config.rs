use std::time::Duration;

use opendota_model::Mode;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when no hostname is configured.
pub const HOSTNAME_ENV: &str = "OPEN_DOTA_API";
pub const DEFAULT_HOSTNAME: &str = "https://api.opendota.com/api";

const COOLDOWN_WITHOUT_KEY: Duration = Duration::from_millis(250);
const COOLDOWN_WITH_KEY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the API instance, e.g. `https://api.opendota.com/api`.
    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Minimum delay between requests. Zero picks a default depending on the API key.
    #[serde(default)]
    pub cooldown_ms: u64,

    /// Report progress of every request at info level.
    #[serde(default)]
    pub verbose: bool,

    /// Disables TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Retries spent on generic API errors in wait mode. Unbounded when unset.
    #[serde(default)]
    pub max_retries: Option<u32>,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Cooldown handling used by the command line front end.
    #[serde(default)]
    pub mode: Mode,
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: None,
            api_key: None,
            cooldown_ms: 0,
            verbose: false,
            insecure: false,
            max_retries: None,
            retry_delay_ms: default_retry_delay_ms(),
            timeout_ms: None,
            mode: Mode::Wait,
        }
    }
}

impl Config {
    pub fn effective_hostname(&self) -> String {
        resolve_hostname(
            self.hostname.as_deref(),
            std::env::var(HOSTNAME_ENV).ok(),
        )
    }

    /// Configured key, empty strings count as no key.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn cooldown(&self) -> Duration {
        if self.cooldown_ms != 0 {
            Duration::from_millis(self.cooldown_ms)
        } else if self.api_key().is_none() {
            COOLDOWN_WITHOUT_KEY
        } else {
            COOLDOWN_WITH_KEY
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn resolve_hostname(explicit: Option<&str>, from_env: Option<String>) -> String {
    explicit
        .map(String::from)
        .or(from_env)
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_HOSTNAME.into())
}

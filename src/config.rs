use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{anyhow, Result};
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_TIMEOUT_SECS: &str = "30";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash, e.g. `https://api.zapnutre.com.br/api`
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Read `ZAPNUTRE_API_URL` and `ZAPNUTRE_HTTP_TIMEOUT_SECS`, falling back
    /// to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let base_url: String = try_load("ZAPNUTRE_API_URL", DEFAULT_API_URL)?;
        let timeout_secs: u64 = try_load("ZAPNUTRE_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(anyhow!("ZAPNUTRE_HTTP_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw:?}: {e}"))
}

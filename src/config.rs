use crate::dates::Locale;
use crate::errors::ClientError;
use std::{env, time::Duration};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: Locale::default(),
        }
    }
}

impl Config {
    /// Reads `HABITS_API_URL`, `HABITS_API_TIMEOUT_SECS` and `HABITS_LOCALE`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Config::default();

        if let Some(url) = lookup("HABITS_API_URL").filter(|value| !value.trim().is_empty()) {
            config.api_url = normalize_url(&url)?;
        }

        if let Some(raw) = lookup("HABITS_API_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                let message = format!("HABITS_API_TIMEOUT_SECS must be a number, got '{raw}'");
                ClientError::Config(message)
            })?;
            config.timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(raw) = lookup("HABITS_LOCALE") {
            config.locale = raw.parse().map_err(ClientError::Config)?;
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self, ClientError> {
        self.api_url = normalize_url(url)?;
        Ok(self)
    }
}

fn normalize_url(url: &str) -> Result<String, ClientError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::Config(format!(
            "API url must start with http:// or https://, got '{url}'"
        )));
    }
    Ok(trimmed.to_string())
}

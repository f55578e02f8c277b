use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use url::Url;

pub const PROJECT_ID_ENV: &str = "APPER_PROJECT_ID";
pub const PUBLIC_KEY_ENV: &str = "APPER_PUBLIC_KEY";
pub const API_URL_ENV: &str = "APPER_API_URL";
pub const TIMEOUT_ENV: &str = "APPER_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted backend.
#[derive(Clone, Debug)]
pub struct BackendSettings {
    pub project_id: String,
    pub public_key: String,
    pub base_url: Url,
    pub timeout: Duration,
}

impl BackendSettings {
    pub fn new(
        project_id: impl Into<String>,
        public_key: impl Into<String>,
        base_url: Url,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            public_key: public_key.into(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads settings from the process environment.
    ///
    /// `Ok(None)` means the backend is not configured at all; a partial
    /// configuration is an error.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let project_id = read(PROJECT_ID_ENV);
        let public_key = read(PUBLIC_KEY_ENV);
        let api_url = read(API_URL_ENV);
        if project_id.is_none() && public_key.is_none() && api_url.is_none() {
            return Ok(None);
        }

        let project_id = project_id.ok_or_else(|| anyhow!("missing env {}", PROJECT_ID_ENV))?;
        let public_key = public_key.ok_or_else(|| anyhow!("missing env {}", PUBLIC_KEY_ENV))?;
        let api_url = api_url.ok_or_else(|| anyhow!("missing env {}", API_URL_ENV))?;

        let base_url = Url::parse(&api_url).with_context(|| format!("invalid {}", API_URL_ENV))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("{} must be an http(s) base url", API_URL_ENV));
        }

        let timeout = match read(TIMEOUT_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("invalid {}", TIMEOUT_ENV))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Some(
            Self::new(project_id, public_key, base_url).with_timeout(timeout),
        ))
    }
}

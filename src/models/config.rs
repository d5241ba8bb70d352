//! Backend client configuration
//!
//! Values come from the environment, and CLI flags may override them.
//! See `utils/constants.rs` for names and defaults.

use reqwest::Url;
use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT_SECS, ENV_BACKEND_URL, ENV_BACKEND_URL_FALLBACK,
    ENV_TIMEOUT_SECS, USER_AGENT,
};

/// Configuration for [`crate::providers::BackendClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Per-request timeout. Failures are never retried.
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let url = lookup(ENV_BACKEND_URL)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(ENV_BACKEND_URL_FALLBACK).filter(|v| !v.trim().is_empty()));
        if let Some(url) = url {
            config = config.with_base_url(&url)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::invalid_config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            config = config.with_timeout_secs(secs)?;
        }

        info!("🔧 Backend: {} (timeout {}s)", config.base_url, config.timeout.as_secs());
        Ok(config)
    }

    /// Replace the base URL after validating it
    pub fn with_base_url(mut self, url: &str) -> AppResult<Self> {
        self.base_url = normalize_base_url(url)?;
        Ok(self)
    }

    /// Replace the timeout; zero is rejected
    pub fn with_timeout_secs(mut self, secs: u64) -> AppResult<Self> {
        if secs == 0 {
            return Err(AppError::invalid_config("Timeout must be at least one second"));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::invalid_config(format!("Invalid backend URL {:?}: {}", raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::invalid_config(format!(
            "Backend URL must use http or https, got {}",
            parsed.scheme()
        )));
    }

    Ok(trimmed.to_string())
}

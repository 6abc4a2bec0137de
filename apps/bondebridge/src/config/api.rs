use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Backoff policy for persistence commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base * 2^(attempt - 1).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exp)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Always ends with `/` so relative endpoint paths join onto it.
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Load from `BONDE_API_BASE_URL` and the optional tuning variables.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = must_var("BONDE_API_BASE_URL")?;
        if base_url.trim().is_empty() {
            return Err(AppError::config("BONDE_API_BASE_URL is empty"));
        }
        let timeout_secs = parse_var("BONDE_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_attempts = parse_var("BONDE_OUTBOX_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        let base_delay_ms = parse_var("BONDE_OUTBOX_BASE_DELAY_MS", DEFAULT_BASE_DELAY_MS)?;
        if max_attempts == 0 {
            return Err(AppError::config("BONDE_OUTBOX_MAX_ATTEMPTS must be at least 1"));
        }

        Ok(Self {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(base_delay_ms),
            },
        })
    }
}

fn normalize_base_url(mut url: String) -> String {
    let trimmed_len = url.trim_end().len();
    url.truncate(trimmed_len);
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has invalid value '{raw}'"
            ))
        }),
        Err(_) => Ok(default),
    }
}

use thiserror::Error;

use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Upstream returned {status}: {detail}")]
    Http { status: u16, detail: String },
    #[error("Transport error: {detail}")]
    Transport {
        detail: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Decode error: {detail}")]
    Decode { detail: String },
}

impl AppError {
    /// Error code for this error variant.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(err) => ErrorCode::from(err),
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Http { .. } => ErrorCode::UpstreamStatus,
            AppError::Transport { .. } => ErrorCode::UpstreamUnavailable,
            AppError::Decode { .. } => ErrorCode::DecodeError,
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Domain, config and decode failures are deterministic. Transport errors
    /// and 5xx/429 responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport { .. } => true,
            AppError::Http { status, .. } => *status >= 500 || *status == 429,
            AppError::Domain(_) | AppError::Config { .. } | AppError::Decode { .. } => false,
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn http(status: u16, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::Domain(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return AppError::decode(e.to_string());
        }
        AppError::Transport {
            detail: e.to_string(),
            source: e,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::decode(e.to_string())
    }
}

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Wait hint used when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Failure kinds surfaced by the GitLab client. Nothing here is retried
/// internally; callers decide based on [`GitLabError::is_retryable`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitLabError {
    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    RateLimit {
        retry_after_seconds: u64,
        message: String,
    },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Failed to decode GitLab response: {message}")]
    Decode { message: String },
}

pub type Result<T> = std::result::Result<T, GitLabError>;

impl GitLabError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::Decode { .. } => false,
            Self::RateLimit { .. } | Self::Network { .. } => true,
            Self::Api { status, .. } => (500..=599).contains(status),
        }
    }

    /// Upstream HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::RateLimit {
                retry_after_seconds,
                ..
            } => Some(*retry_after_seconds),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "unauthorized",
            Self::RateLimit { .. } => "rate_limited",
            Self::Api { status, .. } if (500..=599).contains(status) => "upstream_error",
            Self::Api { status: 404, .. } => "not_found",
            Self::Api { .. } => "api_error",
            Self::Network { .. } => "network_error",
            Self::Decode { .. } => "decode_error",
        }
    }

    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code().to_string(),
            message: self.to_string(),
            retriable: self.is_retryable(),
            status: self.status(),
            retry_after_seconds: self.retry_after_seconds(),
        }
    }
}

impl From<reqwest::Error> for GitLabError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GitLabError::Decode {
                message: e.to_string(),
            }
        } else {
            GitLabError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for GitLabError {
    fn from(e: serde_json::Error) -> Self {
        GitLabError::Decode {
            message: e.to_string(),
        }
    }
}

/// Serializable view of an error handed back to MCP clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub retriable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

/// Map a non-success response onto the taxonomy. `body` is the raw response
/// text; it is only consulted for generic API errors.
pub fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> GitLabError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitLabError::Authentication {
            message: format!(
                "Authentication failed ({}): check your GitLab token and its scopes",
                status.as_u16()
            ),
        },
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_seconds = parse_retry_after(headers);
            GitLabError::RateLimit {
                retry_after_seconds,
                message: format!(
                    "GitLab rate limit exceeded; retry after {} seconds",
                    retry_after_seconds
                ),
            }
        }
        _ => GitLabError::Api {
            status: status.as_u16(),
            message: extract_error_message(body)
                .unwrap_or_else(|| format!("API error: {}", status.as_u16())),
        },
    }
}

pub fn parse_retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

// GitLab reports validation failures as `{"message": {"field": ["..."]}}`, so
// non-string messages are rendered as compact JSON.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    for key in ["message", "error"] {
        match obj.get(key) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(serde_json::Value::Null) | None => continue,
            Some(serde_json::Value::String(_)) => continue,
            Some(other) => return Some(other.to_string()),
        }
    }
    None
}

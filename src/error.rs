use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Category of a failed tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// Arguments rejected before any remote call was made.
    InvalidArgument,
    /// 401/403 from the remote service, or no usable token.
    Auth,
    /// 429 from the remote service.
    RateLimited,
    /// Any other non-success HTTP status.
    Remote { status: u16 },
    /// Transport failure (DNS, connect, TLS, timeout).
    Network,
    /// The response body could not be decoded.
    Decode,
    /// The agent asked for a tool that is not registered.
    UnknownTool,
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ToolErrorKind::Auth => write!(f, "authentication failed"),
            ToolErrorKind::RateLimited => write!(f, "rate limited"),
            ToolErrorKind::Remote { status } => write!(f, "remote error (HTTP {status})"),
            ToolErrorKind::Network => write!(f, "network error"),
            ToolErrorKind::Decode => write!(f, "unexpected response"),
            ToolErrorKind::UnknownTool => write!(f, "unknown tool"),
        }
    }
}

/// Failure of one of the domain tools.
///
/// The agent layer decides how to present it; see
/// [`crate::tools::Tool::render_error`].
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    /// Status of the response the error was built from.
    http_status: Option<u16>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArgument, message)
    }

    /// Maps a non-success HTTP status and its body to an error.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ToolErrorKind::Auth,
            StatusCode::TOO_MANY_REQUESTS => ToolErrorKind::RateLimited,
            other => ToolErrorKind::Remote {
                status: other.as_u16(),
            },
        };
        Self {
            http_status: Some(status.as_u16()),
            ..Self::new(kind, body)
        }
    }

    /// HTTP status of the failed call, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        self.http_status.or(match self.kind {
            ToolErrorKind::Remote { status } => Some(status),
            ToolErrorKind::RateLimited => Some(429),
            _ => None,
        })
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::new(ToolErrorKind::Decode, err.to_string());
        }
        match err.status() {
            Some(status) => Self::from_status(status, err.to_string()),
            None => Self::new(ToolErrorKind::Network, err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ToolErrorKind::Decode, err.to_string())
    }
}

/// Failure of a conversational turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected model response: {0}")]
    Decode(String),

    #[error("agent stopped after {0} steps without a final answer")]
    StepLimit(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("cannot load environment: {0}")]
    Env(String),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no stored token ({0}); run `musicai auth` first")]
    Missing(String),

    #[error("cannot store token: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed token: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("token refresh failed: {0}")]
    Refresh(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ToolError::from_status(StatusCode::UNAUTHORIZED, "").kind,
            ToolErrorKind::Auth
        );
        assert_eq!(
            ToolError::from_status(StatusCode::FORBIDDEN, "").kind,
            ToolErrorKind::Auth
        );
        assert_eq!(
            ToolError::from_status(StatusCode::TOO_MANY_REQUESTS, "").kind,
            ToolErrorKind::RateLimited
        );
        let err = ToolError::from_status(StatusCode::BAD_GATEWAY, "upstream");
        assert_eq!(err.kind, ToolErrorKind::Remote { status: 502 });
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message, "upstream");
    }

    #[test]
    fn status_survives_kind_mapping() {
        assert_eq!(ToolError::from_status(StatusCode::UNAUTHORIZED, "").status(), Some(401));
        assert_eq!(ToolError::from_status(StatusCode::FORBIDDEN, "").status(), Some(403));
        assert_eq!(
            ToolError::from_status(StatusCode::TOO_MANY_REQUESTS, "").status(),
            Some(429)
        );
        assert_eq!(ToolError::new(ToolErrorKind::Auth, "no token").status(), None);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = ToolError::invalid_argument("limit must be between 1 and 50");
        assert_eq!(
            err.to_string(),
            "invalid argument: limit must be between 1 and 50"
        );
    }
}

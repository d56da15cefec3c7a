//! MCP Error Types
//!
//! Every failure of a tool call falls into one of these kinds, and each
//! kind implies a different caller decision:
//!
//! | Kind | Raised when | Retry? |
//! |---|---|---|
//! | `Configuration` | no credential at construction | never |
//! | `Transport` | non-2xx, DNS/TLS/connect failure, timeout | 429/5xx/connection only |
//! | `RemoteTool` | 2xx body carries `error` | never (call may not be idempotent) |
//! | `MalformedResponse` | 2xx body has neither `error` nor `result.content[0].text` | never |

use thiserror::Error;

/// MCP Client Error
#[derive(Debug, Error)]
pub enum McpError {
    /// Missing or invalid configuration, detected before any network activity
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller passed an argument the client refuses to send
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP-level failure. `status` is `None` when no response was received.
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The remote side answered with a JSON-RPC `error` member
    #[error("MCP error: {message}")]
    RemoteTool { code: Option<i64>, message: String },

    /// The remote side answered 2xx with a body that breaks the response contract
    #[error("Malformed MCP response: {0}")]
    MalformedResponse(String),

    /// Request serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        McpError::Configuration(msg.into())
    }

    /// Transport failure with no HTTP response (DNS, TLS, connect, timeout)
    pub fn connection(msg: impl Into<String>) -> Self {
        McpError::Transport {
            status: None,
            message: msg.into(),
        }
    }

    /// Transport failure carrying the HTTP status and whatever body was returned
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        McpError::Transport {
            status: Some(status),
            message: body.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        McpError::MalformedResponse(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, McpError::Configuration(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, McpError::Transport { .. })
    }

    pub fn is_remote_tool(&self) -> bool {
        matches!(self, McpError::RemoteTool { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, McpError::MalformedResponse(_))
    }

    /// HTTP status of a transport failure, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            McpError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether resending the same request may succeed.
    ///
    /// Only transport failures qualify: connection-level errors, HTTP 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            McpError::Transport { status: None, .. } => true,
            McpError::Transport {
                status: Some(status),
                ..
            } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;

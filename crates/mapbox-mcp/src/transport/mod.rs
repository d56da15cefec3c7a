//! MCP Transport Layer
//!
//! A transport carries one serialized JSON-RPC message to the server and
//! hands back the raw response body. Status handling lives here; JSON-RPC
//! semantics live in the client.

pub mod http;

use crate::protocol::McpError;
use async_trait::async_trait;

pub use http::{HttpTransport, HttpTransportBuilder};

/// Transport trait for MCP communication
///
/// Implementations must be safe to call concurrently through `&self`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one message and return the response body.
    ///
    /// Non-2xx statuses and connection failures must map to
    /// [`McpError::Transport`].
    async fn post(&self, message: &str) -> Result<String, McpError>;

    /// Endpoint description used in logs
    fn endpoint(&self) -> &str;
}

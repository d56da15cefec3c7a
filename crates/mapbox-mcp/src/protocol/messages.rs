//! JSON-RPC 2.0 Message Types
//!
//! The hosted MCP endpoint speaks JSON-RPC 2.0 over HTTP POST. Requests are
//! built strictly; responses are parsed leniently because the service may
//! omit `jsonrpc`, `id`, and `error.code`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::McpError;

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0"
    pub jsonrpc: &'static str,

    pub id: RequestId,

    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: id.into(),
            method: method.into(),
            params: None,
        }
    }

    /// Attach parameters. Fails only if `params` cannot be represented as JSON.
    pub fn with_params<P: Serialize>(mut self, params: P) -> Result<Self, McpError> {
        self.params = Some(serde_json::to_value(params)?);
        Ok(self)
    }
}

/// JSON-RPC 2.0 Response
///
/// A well-formed response contains either a result or an error, never both.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,

    /// Echo of the request id, when the server sends one
    #[serde(default)]
    pub id: Option<RequestId>,

    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Split the response into its result, a remote error, or a contract violation.
    pub fn into_result(self) -> Result<Value, McpError> {
        match (self.result, self.error) {
            (None, Some(error)) => Err(error.into()),
            (Some(result), None) => Ok(result),
            (Some(_), Some(_)) => Err(McpError::malformed(
                "response carries both `result` and `error`",
            )),
            (None, None) => Err(McpError::malformed(
                "response carries neither `result` nor `error`",
            )),
        }
    }
}

/// JSON-RPC 2.0 Error Object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: Option<i64>,

    pub message: String,

    #[serde(default)]
    pub data: Option<Value>,
}

impl From<JsonRpcError> for McpError {
    fn from(error: JsonRpcError) -> Self {
        McpError::RemoteTool {
            code: error.code,
            message: error.message,
        }
    }
}

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Request ID - can be a string or number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        RequestId::Number(n)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
        }
    }
}

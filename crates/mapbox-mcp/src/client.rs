//! MCP Client Implementation
//!
//! The client frames tool calls as JSON-RPC 2.0, sends them through a
//! [`Transport`], and normalizes the answer into text or an [`McpError`].
//! It holds only immutable configuration and an atomic request counter, so
//! one instance can be shared behind an `Arc` and called concurrently.

use crate::config::{McpClientConfig, RetryPolicy};
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, McpError, McpTool, McpToolResult, RequestId, ToolCallParams,
    ToolsListResult, TOOLS_CALL, TOOLS_LIST,
};
use crate::transport::{HttpTransport, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// Client for the hosted Mapbox MCP server
pub struct MapboxMcpClient {
    transport: Arc<dyn Transport>,

    /// Request ID counter; the first request is sent with id 1
    request_id: AtomicU64,

    retry: RetryPolicy,
}

impl MapboxMcpClient {
    /// Create a client from an explicit token, falling back to `MAPBOX_ACCESS_TOKEN`.
    ///
    /// Fails with [`McpError::Configuration`] when neither source yields a token.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = MapboxMcpClient::new(None)?; // reads MAPBOX_ACCESS_TOKEN
    /// let text = client
    ///     .call_tool("distance_tool", serde_json::json!({"from": [-74.0, 40.71], "to": [-73.98, 40.75]}))
    ///     .await?;
    /// ```
    pub fn new(access_token: Option<String>) -> Result<Self, McpError> {
        Self::resolve(access_token, |key| std::env::var(key).ok())
    }

    /// Like [`new`](Self::new), but environment variables are read through `lookup`
    pub fn resolve<F>(access_token: Option<String>, lookup: F) -> Result<Self, McpError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::with_config(McpClientConfig::resolve(access_token, lookup)?)
    }

    /// Create a client using only the environment for configuration
    pub fn from_env() -> Result<Self, McpError> {
        Self::with_config(McpClientConfig::from_env()?)
    }

    /// Create a client over HTTPS from a resolved configuration
    pub fn with_config(config: McpClientConfig) -> Result<Self, McpError> {
        let transport = HttpTransport::from_config(&config)?;
        debug!(endpoint = %config.endpoint(), timeout = ?config.request_timeout, "Created MCP client");
        Ok(Self::with_transport(transport, config.retry))
    }

    /// Create a client over any transport
    pub fn with_transport<T: Transport + 'static>(transport: T, retry: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            request_id: AtomicU64::new(1),
            retry,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Call a tool and return the text of the first content item.
    ///
    /// `arguments` must be a JSON object; it is forwarded without validation.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = client.call_tool("calculate_distance", serde_json::json!({
    ///     "from": [-74.0, 40.71],
    ///     "to": [-73.98, 40.75],
    ///     "units": "miles"
    /// })).await?;
    /// ```
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, McpError> {
        let result = self.call_tool_result(name, arguments).await?;
        if result.is_error {
            warn!(tool_name = %name, "Tool reported an error result");
        }
        result.into_first_text()
    }

    /// Call a tool with typed arguments
    pub async fn call_tool_typed<A: Serialize>(
        &self,
        name: &str,
        arguments: A,
    ) -> Result<String, McpError> {
        let args = serde_json::to_value(arguments)?;
        self.call_tool(name, args).await
    }

    /// Call a tool and return the full result, including every content item
    #[instrument(skip(self, arguments), fields(tool_name = %name))]
    pub async fn call_tool_result(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<McpToolResult, McpError> {
        let params = build_call_params(name, arguments)?;
        debug!("Calling MCP tool");

        let result: McpToolResult = self.send_request(TOOLS_CALL, Some(params)).await?;

        debug!(
            content_count = result.content.len(),
            is_error = result.is_error,
            "Tool call completed"
        );
        Ok(result)
    }

    /// List every tool the server exposes, following pagination cursors
    #[instrument(skip(self))]
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let params = cursor.take().map(|c| serde_json::json!({ "cursor": c }));
            let page: ToolsListResult = self.send_request(TOOLS_LIST, params).await?;

            for tool in &page.tools {
                trace!(tool_name = %tool.name, description = ?tool.description, "Found MCP tool");
            }
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) if !next.is_empty() => {
                    if !seen_cursors.insert(next.clone()) {
                        return Err(McpError::malformed(format!(
                            "repeated `nextCursor` {next:?} in `{TOOLS_LIST}` pagination"
                        )));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(tool_count = tools.len(), "Listed MCP tools");
        Ok(tools)
    }

    // ========================================
    // Internal Helper Methods
    // ========================================

    fn next_request_id(&self) -> RequestId {
        RequestId::Number(self.request_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn send_request<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, McpError> {
        let id = self.next_request_id();

        let mut request = JsonRpcRequest::new(id.clone(), method);
        if let Some(p) = params {
            request = request.with_params(p)?;
        }

        let request_json = serde_json::to_string(&request)?;
        trace!(method = %method, id = %id, "Sending JSON-RPC request");

        let body = self.post_with_retry(&request_json).await?;

        let response: JsonRpcResponse = serde_json::from_str(&body)
            .map_err(|e| McpError::malformed(format!("response is not a JSON-RPC object: {}", e)))?;

        if let Some(actual) = &response.id {
            if *actual != id {
                return Err(McpError::malformed(format!(
                    "response id mismatch: expected {}, got {}",
                    id, actual
                )));
            }
        }

        let result = response.into_result()?;

        serde_json::from_value(result)
            .map_err(|e| McpError::malformed(format!("unexpected `{}` result: {}", method, e)))
    }

    async fn post_with_retry(&self, message: &str) -> Result<String, McpError> {
        let mut retries = 0;
        loop {
            match self.transport.post(message).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && retries < self.retry.max_retries => {
                    retries += 1;
                    let delay = self.retry.backoff_for(retries);
                    warn!(
                        error = %err,
                        attempt = retries,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying MCP request after transport failure"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl std::fmt::Debug for MapboxMcpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxMcpClient")
            .field("endpoint", &self.transport.endpoint())
            .field("next_request_id", &self.request_id.load(Ordering::SeqCst))
            .field("retry", &self.retry)
            .finish()
    }
}

fn build_call_params(name: &str, arguments: Value) -> Result<ToolCallParams, McpError> {
    if name.trim().is_empty() {
        return Err(McpError::InvalidArgument(
            "tool name must not be empty".to_string(),
        ));
    }
    let arguments: Map<String, Value> = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(McpError::InvalidArgument(format!(
                "tool arguments must be a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };
    Ok(ToolCallParams {
        name: name.to_string(),
        arguments,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

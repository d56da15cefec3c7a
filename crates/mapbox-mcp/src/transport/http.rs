//! HTTP Transport for MCP
//!
//! Sends each JSON-RPC message as an HTTPS POST and returns the response
//! body. Streamable-HTTP servers may answer with a `text/event-stream`
//! body; the JSON payload of its last `data:` event is extracted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mapbox_mcp::HttpTransport;
//!
//! let transport = HttpTransport::new("https://mcp.mapbox.com/mcp")
//!     .with_header("Authorization", "Bearer pk.your-token")
//!     .build()?;
//! ```

use crate::config::McpClientConfig;
use crate::protocol::McpError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace};

/// HTTP Transport for MCP communication
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    /// Extra headers sent on every request (e.g. `Authorization`)
    headers: HashMap<String, String>,
}

impl HttpTransport {
    /// Create a new HTTP transport builder
    pub fn new(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(url)
    }

    /// Transport for the configured endpoint, authenticated with the configured bearer token
    pub fn from_config(config: &McpClientConfig) -> Result<Self, McpError> {
        HttpTransport::new(config.endpoint())
            .with_header("Authorization", config.bearer())
            .with_timeout(config.request_timeout)
            .build()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Builder for HttpTransport
pub struct HttpTransportBuilder {
    url: String,
    headers: HashMap<String, String>,
    timeout: Duration,
}

impl HttpTransportBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: crate::config::DEFAULT_TIMEOUT,
        }
    }

    /// Add a custom header to all requests
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the per-request timeout (default: 30s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the transport
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be created.
    pub fn build(self) -> Result<HttpTransport, McpError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| McpError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpTransport {
            url: self.url,
            client,
            headers: self.headers,
        })
    }
}

#[async_trait]
impl super::Transport for HttpTransport {
    async fn post(&self, message: &str) -> Result<String, McpError> {
        debug!(url = %self.url, bytes = message.len(), "MCP HTTP send");
        trace!(url = %self.url, "MCP HTTP request body: {}", message);

        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header("Accept", "application/json, text/event-stream");

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = request
            .body(message.to_string())
            .send()
            .await
            .map_err(|e| McpError::connection(describe_reqwest_error(&e)))?;

        let status = response.status();
        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("text/event-stream"))
            .unwrap_or(false);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::http_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| McpError::connection(format!("Failed to read response: {}", e)))?;

        debug!(url = %self.url, status = status.as_u16(), "MCP HTTP response");
        trace!(url = %self.url, "MCP HTTP response body: {}", body);

        if is_event_stream {
            return extract_event_stream_payload(&body).ok_or_else(|| {
                McpError::malformed("event stream response carried no `data:` payload")
            });
        }
        Ok(body)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("HTTP request timed out: {}", e)
    } else if e.is_connect() {
        format!("HTTP connection failed: {}", e)
    } else {
        format!("HTTP request failed: {}", e)
    }
}

/// JSON payload of the last `data:` event in a server-sent-events body.
///
/// Multi-line events are joined with `\n` as the SSE format prescribes.
pub(crate) fn extract_event_stream_payload(body: &str) -> Option<String> {
    let mut last = None;
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines().chain(std::iter::once("")) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            if !current.is_empty() {
                last = Some(current.join("\n"));
                current.clear();
            }
        } else if let Some(data) = line.strip_prefix("data:") {
            current.push(data.strip_prefix(' ').unwrap_or(data));
        }
    }
    last
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

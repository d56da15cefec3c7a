//! MCP Protocol Types
//!
//! Shapes of the `tools/call` and `tools/list` payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::protocol::McpError;

/// JSON-RPC method used to invoke a remote tool
pub const TOOLS_CALL: &str = "tools/call";

/// JSON-RPC method used to enumerate remote tools
pub const TOOLS_LIST: &str = "tools/list";

// ============================================
// Tool Types
// ============================================

/// MCP Tool Definition, as returned by `tools/list`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct McpTool {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// JSON Schema for the tool's input parameters
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<McpTool>,

    /// Cursor for pagination
    #[serde(rename = "nextCursor", default)]
    pub next_cursor: Option<String>,
}

/// `params` of a `tools/call` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,

    pub arguments: Map<String, Value>,
}

/// Result of calling a tool
#[derive(Debug, Clone, Deserialize)]
pub struct McpToolResult {
    pub content: Vec<McpContent>,

    /// Set by the server when the tool itself failed
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl McpToolResult {
    /// Text of the first content item; later items are ignored.
    pub fn first_text(&self) -> Result<&str, McpError> {
        let first = self
            .content
            .first()
            .ok_or_else(|| McpError::malformed("`result.content` is empty"))?;
        first
            .as_text()
            .ok_or_else(|| McpError::malformed("`result.content[0]` has no `text`"))
    }

    pub fn into_first_text(self) -> Result<String, McpError> {
        self.first_text().map(str::to_owned)
    }
}

// ============================================
// Content Types
// ============================================

/// One item of a tool result's `content` array.
///
/// Only `text` is required by the contract; `type` is optional because the
/// hosted service may omit it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct McpContent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Base64 payload of image or blob content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl McpContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: Some("text".to_string()),
            text: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Human-readable rendering used when forwarding content to an agent
    pub fn render(&self) -> Option<String> {
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        match (&self.data, &self.mime_type, &self.uri) {
            (Some(data), Some(mime), _) => Some(format!("[{}: {} bytes]", mime, data.len())),
            (_, _, Some(uri)) => Some(format!("[Resource: {}]", uri)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_deserialization() {
        let json = r#"{
            "name": "isochrone_tool",
            "description": "Reachable area within a time budget",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "coordinates": {"type": "array"}
                },
                "required": ["coordinates"]
            }
        }"#;

        let tool: McpTool = serde_json::from_str(json).unwrap();
        assert_eq!(tool.name, "isochrone_tool");
        assert_eq!(
            tool.description.as_deref(),
            Some("Reachable area within a time budget")
        );
        assert_eq!(tool.input_schema["required"][0], "coordinates");
    }

    #[test]
    fn test_untyped_content_deserialization() {
        let result: McpToolResult =
            serde_json::from_str(r#"{"content":[{"text":"42 miles"},{"text":"ignored"}]}"#)
                .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.first_text().unwrap(), "42 miles");
    }

    #[test]
    fn test_typed_content_deserialization() {
        let result: McpToolResult = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Hello, world!"}],"isError":true}"#,
        )
        .unwrap();
        assert!(result.is_error);
        assert_eq!(result.content[0].kind.as_deref(), Some("text"));
    }

    #[test]
    fn test_first_text_requires_text() {
        let empty = McpToolResult {
            content: vec![],
            is_error: false,
        };
        assert!(empty.first_text().unwrap_err().is_malformed());

        let image_first = McpToolResult {
            content: vec![McpContent {
                kind: Some("image".into()),
                data: Some("aGk=".into()),
                mime_type: Some("image/png".into()),
                ..McpContent::default()
            }],
            is_error: false,
        };
        assert!(image_first.first_text().unwrap_err().is_malformed());
        assert_eq!(
            image_first.content[0].render().as_deref(),
            Some("[image/png: 4 bytes]")
        );
    }

    #[test]
    fn test_content_helper() {
        let content = McpContent::text("test content");
        assert_eq!(content.as_text(), Some("test content"));
        assert_eq!(content.render().as_deref(), Some("test content"));
    }
}

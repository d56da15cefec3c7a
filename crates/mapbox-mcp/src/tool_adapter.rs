//! MCP Tool Adapter
//!
//! Wraps tools discovered through `tools/list` so they can sit in a
//! [`ToolRegistry`](geo_tools_core::ToolRegistry) next to the typed geo tools.

use crate::{MapboxMcpClient, McpTool};
use geo_tools_core::{Tool, ToolBox, ToolContext, ToolParameterSchema, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Schema keywords mapped onto dedicated [`ToolParameterSchema`] fields
const KNOWN_KEYWORDS: [&str; 7] = [
    "type",
    "description",
    "properties",
    "required",
    "items",
    "enum",
    "default",
];

/// Exposes one remote MCP tool through the [`Tool`] trait
pub struct McpToolAdapter {
    client: Arc<MapboxMcpClient>,

    tool: McpTool,

    /// Optional prefix for the agent-facing name
    namespace: Option<String>,
}

impl McpToolAdapter {
    pub fn new(client: Arc<MapboxMcpClient>, tool: McpTool) -> Self {
        Self {
            client,
            tool,
            namespace: None,
        }
    }

    /// Prefix the agent-facing name, e.g. `mapbox` turns `isochrone_tool`
    /// into `mapbox_isochrone_tool`. The remote call still uses the bare name.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn into_toolbox(self) -> ToolBox {
        Arc::new(self)
    }

    /// Agent-facing name; dashes become underscores so the name matches `^[a-zA-Z0-9_-]+$`
    fn effective_name(&self) -> String {
        format_name(self.namespace.as_deref(), &self.tool.name)
    }

    /// Function parameters are always an object, even when `inputSchema` omits `type`
    fn convert_input_schema(schema: &Value) -> ToolParameterSchema {
        let mut converted = Self::convert_schema(schema);
        if converted.schema_type.is_empty() && !converted.additional.contains_key("type") {
            converted.schema_type = "object".to_string();
        }
        converted
    }

    /// Untyped schemas (`anyOf`, `oneOf`, ...) keep an empty `type` so it is not emitted;
    /// a non-string `type` such as `["string", "null"]` is passed through verbatim.
    fn convert_schema(schema: &Value) -> ToolParameterSchema {
        let schema_type = schema
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let properties = schema.get("properties").and_then(Value::as_object).map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), Self::convert_schema(v)))
                .collect::<BTreeMap<_, _>>()
        });

        let required = schema.get("required").and_then(Value::as_array).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        });

        let additional: HashMap<String, Value> = schema
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(key, value)| {
                !KNOWN_KEYWORDS.contains(&key.as_str()) || (key.as_str() == "type" && !value.is_string())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        ToolParameterSchema {
            schema_type,
            description: schema
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            properties,
            required,
            items: schema
                .get("items")
                .map(|i| Box::new(Self::convert_schema(i))),
            enum_values: schema.get("enum").and_then(|e| e.as_array().cloned()),
            default: schema.get("default").cloned(),
            additional,
        }
    }
}

fn format_name(namespace: Option<&str>, name: &str) -> String {
    let safe_name = name.replace('-', "_");
    match namespace {
        Some(ns) => format!("{}_{}", ns, safe_name),
        None => safe_name,
    }
}

#[async_trait]
impl Tool for McpToolAdapter {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.effective_name(),
            self.tool.description.clone().unwrap_or_default(),
            Self::convert_input_schema(&self.tool.input_schema),
        )
    }

    #[instrument(skip(self, args, ctx), fields(tool_name = %self.effective_name()))]
    async fn execute(&self, args: Value, ctx: ToolContext) -> anyhow::Result<ToolResult> {
        debug!(remote = %self.tool.name, namespace = ?self.namespace, "Executing MCP tool via adapter");

        let result = self.client.call_tool_result(&self.tool.name, args).await?;

        let content = result
            .content
            .iter()
            .filter_map(|c| c.render())
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error {
            Ok(ToolResult::text(&ctx, format!("Error: {}", content)))
        } else {
            Ok(ToolResult::text(&ctx, content))
        }
    }
}

/// Adapters for every listed tool, sharing one client
///
/// ```rust,ignore
/// let client = Arc::new(MapboxMcpClient::from_env()?);
/// let listed = client.list_tools().await?;
/// let tools = create_mcp_tools(client, listed, Some("mapbox"));
/// ```
pub fn create_mcp_tools(
    client: Arc<MapboxMcpClient>,
    tools: impl IntoIterator<Item = McpTool>,
    namespace: Option<&str>,
) -> Vec<ToolBox> {
    tools
        .into_iter()
        .map(|tool| {
            let mut adapter = McpToolAdapter::new(client.clone(), tool);
            if let Some(ns) = namespace {
                adapter = adapter.with_namespace(ns);
            }
            adapter.into_toolbox()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::protocol::McpError;
    use crate::transport::Transport;
    use serde_json::json;

    struct FixedTransport(&'static str);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn post(&self, _message: &str) -> Result<String, McpError> {
            Ok(self.0.to_string())
        }

        fn endpoint(&self) -> &str {
            "mock://mcp"
        }
    }

    fn isochrone_tool() -> McpTool {
        McpTool {
            name: "isochrone-tool".to_string(),
            description: Some("Reachable area".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "coordinates": {
                        "type": "array",
                        "items": {"type": "number"},
                        "minItems": 2,
                        "maxItems": 2
                    },
                    "profile": {
                        "type": "string",
                        "enum": ["mapbox/walking", "mapbox/cycling"],
                        "default": "mapbox/walking"
                    }
                },
                "required": ["coordinates"]
            }),
        }
    }

    fn client(reply: &'static str) -> Arc<MapboxMcpClient> {
        Arc::new(MapboxMcpClient::with_transport(
            FixedTransport(reply),
            RetryPolicy::none(),
        ))
    }

    #[test]
    fn test_schema_conversion() {
        let schema = McpToolAdapter::convert_schema(&isochrone_tool().input_schema);

        assert_eq!(schema.schema_type, "object");
        assert_eq!(schema.required.as_ref().unwrap(), &vec!["coordinates"]);

        let props = schema.properties.unwrap();
        let coords = &props["coordinates"];
        assert_eq!(coords.schema_type, "array");
        assert_eq!(coords.items.as_ref().unwrap().schema_type, "number");
        assert_eq!(coords.additional["minItems"], 2);
        assert_eq!(props["profile"].default, Some(json!("mapbox/walking")));
        assert_eq!(props["profile"].enum_values.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_schema_conversion_empty() {
        let schema = McpToolAdapter::convert_input_schema(&json!({}));
        assert_eq!(schema.schema_type, "object");
        assert!(schema.properties.is_none());
        assert!(schema.additional.is_empty());
    }

    #[test]
    fn test_untyped_property_keeps_no_type() {
        let schema = McpToolAdapter::convert_input_schema(&json!({
            "type": "object",
            "properties": {
                "proximity": {
                    "anyOf": [
                        {"type": "array", "items": {"type": "number"}},
                        {"type": "string", "enum": ["ip"]}
                    ]
                },
                "limit": {"type": ["integer", "null"]}
            }
        }));

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert!(value["properties"]["proximity"].get("type").is_none());
        assert_eq!(value["properties"]["proximity"]["anyOf"][1]["enum"], json!(["ip"]));
        assert_eq!(value["properties"]["limit"]["type"], json!(["integer", "null"]));
    }

    #[test]
    fn test_name_formatting() {
        assert_eq!(format_name(None, "directions_tool"), "directions_tool");
        assert_eq!(format_name(Some("mapbox"), "isochrone-tool"), "mapbox_isochrone_tool");
    }

    #[test]
    fn test_create_mcp_tools_namespaced() {
        let tools = create_mcp_tools(client("{}"), vec![isochrone_tool()], Some("mapbox"));
        assert_eq!(tools.len(), 1);
        let schema = tools[0].schema();
        assert_eq!(schema.name, "mapbox_isochrone_tool");
        assert_eq!(schema.description, "Reachable area");
    }

    #[tokio::test]
    async fn test_execute_joins_content() {
        let adapter = McpToolAdapter::new(
            client(r#"{"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"a"},{"type":"text","text":"b"}]}}"#),
            isochrone_tool(),
        );

        let result = adapter
            .execute(json!({"coordinates": [-122.4, 37.79]}), ToolContext::new())
            .await
            .unwrap();
        assert_eq!(result.as_text(), Some("a\nb"));
    }

    #[tokio::test]
    async fn test_execute_marks_tool_errors() {
        let adapter = McpToolAdapter::new(
            client(r#"{"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"no route"}],"isError":true}}"#),
            isochrone_tool(),
        );

        let result = adapter.execute(json!({}), ToolContext::new()).await.unwrap();
        assert_eq!(result.as_text(), Some("Error: no route"));
    }

    #[tokio::test]
    async fn test_execute_propagates_remote_error() {
        let adapter = McpToolAdapter::new(
            client(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"unknown tool"}}"#),
            isochrone_tool(),
        );

        let err = adapter.execute(json!({}), ToolContext::new()).await.unwrap_err();
        assert!(err
            .downcast_ref::<McpError>()
            .is_some_and(McpError::is_remote_tool));
    }
}

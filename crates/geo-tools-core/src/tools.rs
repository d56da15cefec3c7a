//! Core tool system for agent integrations
//!
//! This module provides the schema-driven tool contract that every
//! framework adapter builds on:
//! - JSON Schema descriptions of tool parameters
//! - The async [`Tool`] trait that wrappers implement
//! - A registry for discovery and dispatch by name

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::error::ToolError;
use crate::messaging::{AgentMessage, MessageContent, MessageMetadata, MessageRole, ToolInvocation};

/// JSON Schema definition for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameterSchema {
    /// JSON Schema type (object, string, number, boolean, array, null).
    /// Empty for schemas that constrain by composition (`anyOf`, `oneOf`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub schema_type: String,

    /// Description of this parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ToolParameterSchema>>,

    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ToolParameterSchema>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Additional schema keywords (minimum, maxItems, pattern, ...)
    #[serde(flatten)]
    pub additional: HashMap<String, Value>,
}

impl ToolParameterSchema {
    fn of_type(schema_type: &str, description: Option<String>) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            description,
            properties: None,
            required: None,
            items: None,
            enum_values: None,
            default: None,
            additional: HashMap::new(),
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::of_type("string", Some(description.into()))
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::of_type("integer", Some(description.into()))
    }

    /// Create an object parameter with properties
    pub fn object(
        description: impl Into<String>,
        properties: BTreeMap<String, ToolParameterSchema>,
        required: Vec<String>,
    ) -> Self {
        Self {
            properties: Some(properties),
            required: Some(required),
            ..Self::of_type("object", Some(description.into()))
        }
    }

    /// Create an array parameter
    pub fn array(description: impl Into<String>, items: ToolParameterSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type("array", Some(description.into()))
        }
    }

    /// `[longitude, latitude]` pair, the coordinate shape every geospatial tool accepts
    pub fn coordinates(description: impl Into<String>) -> Self {
        Self::array(description, Self::of_type("number", None))
            .with_keyword("minItems", Value::from(2))
            .with_keyword("maxItems", Value::from(2))
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_keyword(mut self, key: impl Into<String>, value: Value) -> Self {
        self.additional.insert(key.into(), value);
        self
    }
}

/// Complete schema definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique, stable name the LLM uses to invoke the tool
    pub name: String,

    pub description: String,

    /// Input parameter schema (an object with properties)
    pub parameters: ToolParameterSchema,
}

impl ToolSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Context handed to a tool for one invocation
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Call id assigned by the agent framework, echoed on the response message
    pub tool_call_id: Option<String>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_id(mut self, call_id: Option<String>) -> Self {
        self.tool_call_id = call_id;
        self
    }

    fn metadata(&self) -> Option<MessageMetadata> {
        self.tool_call_id.as_ref().map(|id| MessageMetadata {
            tool_call_id: Some(id.clone()),
        })
    }

    /// Create a tool response message with proper metadata
    pub fn text_response(&self, content: impl Into<String>) -> AgentMessage {
        AgentMessage {
            role: MessageRole::Tool,
            content: MessageContent::Text(content.into()),
            metadata: self.metadata(),
        }
    }
}

/// Result of a tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub message: AgentMessage,
}

impl ToolResult {
    pub fn text(ctx: &ToolContext, content: impl Into<String>) -> Self {
        Self {
            message: ctx.text_response(content),
        }
    }

    /// Text payload, if the tool answered with text
    pub fn as_text(&self) -> Option<&str> {
        self.message.content.as_text()
    }
}

/// Core trait for tool implementations
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the schema definition for this tool
    fn schema(&self) -> ToolSchema;

    /// Executes the tool with the given arguments and context
    async fn execute(&self, args: Value, ctx: ToolContext) -> anyhow::Result<ToolResult>;
}

/// Type alias for shared tool instances
pub type ToolBox = Arc<dyn Tool>;

/// Tool registry for managing, discovering and dispatching tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolBox>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A later registration under the same name replaces the earlier one.
    pub fn register(&mut self, tool: ToolBox) -> &mut Self {
        let name = tool.schema().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            debug!(tool_name = %name, "Replaced previously registered tool");
        }
        self
    }

    pub fn register_all<I>(&mut self, tools: I) -> &mut Self
    where
        I: IntoIterator<Item = ToolBox>,
    {
        for tool in tools {
            self.register(tool);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolBox> {
        self.tools.get(name)
    }

    /// Tool schemas, sorted by name so prompts stay stable between runs
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Sorted tool names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call to the named tool
    pub async fn invoke(
        &self,
        name: &str,
        args: Value,
        ctx: ToolContext,
    ) -> anyhow::Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!(tool_name = %name, "Dispatching tool call");
        tool.execute(args, ctx).await
    }

    /// Dispatch a framework-supplied invocation, propagating its call id
    pub async fn handle(&self, invocation: ToolInvocation) -> anyhow::Result<ToolResult> {
        let ctx = ToolContext::new().with_call_id(invocation.tool_call_id);
        self.invoke(&invocation.tool_name, invocation.args, ctx).await
    }
}

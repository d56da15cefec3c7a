//! Core traits and shared data models for exposing geospatial tools to LLM agents.
//! This crate keeps the tool-registration primitives lightweight and transport-agnostic
//! so the MCP client and any agent framework adapter can compose them.

pub mod error;
pub mod formats;
pub mod messaging;
pub mod tools;

pub use error::ToolError;
pub use formats::{AnthropicToolDefinition, OpenAiFunctionDefinition};
pub use messaging::{AgentMessage, MessageContent, MessageMetadata, MessageRole, ToolInvocation};
pub use tools::{
    Tool, ToolBox, ToolContext, ToolParameterSchema, ToolRegistry, ToolResult, ToolSchema,
};

use thiserror::Error;

/// Errors raised by the tool layer before a call ever reaches a remote service.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name is registered
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// Arguments supplied by the agent do not match the tool's schema
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

impl ToolError {
    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

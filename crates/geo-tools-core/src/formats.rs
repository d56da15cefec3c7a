//! Function-definition shapes used when registering tools with LLM providers.

use serde::Serialize;
use serde_json::Value;

use crate::tools::ToolSchema;

/// OpenAI chat-completions `tools[]` entry
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiFunctionDefinition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: OpenAiFunction,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenAiFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Anthropic messages API `tools[]` entry
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolSchema {
    fn parameters_value(&self) -> Value {
        serde_json::to_value(&self.parameters).unwrap_or_else(|_| serde_json::json!({}))
    }

    pub fn to_openai_function(&self) -> OpenAiFunctionDefinition {
        OpenAiFunctionDefinition {
            kind: "function",
            function: OpenAiFunction {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameters_value(),
            },
        }
    }

    pub fn to_anthropic_tool(&self) -> AnthropicToolDefinition {
        AnthropicToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.parameters_value(),
        }
    }
}

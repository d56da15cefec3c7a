//! # mapbox-mcp
//!
//! Client for the hosted Mapbox Model Context Protocol (MCP) server.
//!
//! Every Mapbox capability (routing, category search, distance, isochrones)
//! is reached through one JSON-RPC `tools/call` request sent over HTTPS with
//! a bearer token. This crate frames those requests, normalizes the answers
//! into text or a typed [`McpError`], and exposes agent-facing tools built on
//! [`geo_tools_core::Tool`].
//!
//! ## Features
//!
//! - **JSON-RPC 2.0**: request framing with monotonic ids and lenient response parsing
//! - **HTTP Transport**: bearer-authenticated POSTs, with JSON and event-stream responses
//! - **Geo Tools**: `get_directions`, `search_poi`, `calculate_distance`, `get_isochrone`
//! - **Tool Adapter**: wraps any tool advertised by `tools/list`
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use geo_tools_core::ToolRegistry;
//! use mapbox_mcp::{mapbox_tools, MapboxMcpClient};
//!
//! // Reads MAPBOX_ACCESS_TOKEN
//! let client = Arc::new(MapboxMcpClient::from_env()?);
//!
//! // Call a remote tool directly
//! let miles = client
//!     .call_tool("distance_tool", serde_json::json!({"from": [-74.0, 40.71], "to": [-73.98, 40.75]}))
//!     .await?;
//!
//! // Or hand the typed tools to an agent
//! let mut registry = ToolRegistry::new();
//! registry.register_all(mapbox_tools(client));
//! ```

pub mod config;
pub mod geo;
pub mod protocol;
pub mod transport;

mod client;
mod tool_adapter;

// Re-exports
pub use client::MapboxMcpClient;
pub use config::{McpClientConfig, RetryPolicy, ACCESS_TOKEN_ENV, MAPBOX_MCP_URL};
pub use geo::{
    mapbox_tools, CalculateDistanceTool, Coordinates, DistanceUnit, GetDirectionsTool,
    GetIsochroneTool, SearchPoiTool, TravelProfile,
};
pub use protocol::{McpContent, McpError, McpResult, McpTool, McpToolResult};
pub use tool_adapter::{create_mcp_tools, McpToolAdapter};
pub use transport::{HttpTransport, Transport};

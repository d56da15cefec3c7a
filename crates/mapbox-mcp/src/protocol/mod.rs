//! MCP Protocol implementation
//!
//! This module contains the wire-level types for talking to the MCP endpoint:
//! - JSON-RPC 2.0 message types
//! - `tools/call` and `tools/list` payloads
//! - The client error taxonomy

pub mod error;
pub mod messages;
pub mod types;

pub use error::{McpError, McpResult};
pub use messages::*;
pub use types::*;

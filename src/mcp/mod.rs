//! MCP (Model Context Protocol) tool surface for workspace queries.
//!
//! Transport and server lifecycle belong to the embedding process; this
//! module only describes the tools and turns tool calls into queries.

/// Tool definitions and dispatch.
pub mod tools;

pub use tools::{get_tool_definitions, handle_tool_call, ToolDefinition};

//! MCP tool definitions and dispatch for workspace queries.
//!
//! Each tool maps to one `Workspace` query. Tool definitions include JSON
//! Schema descriptions so that MCP clients can discover available
//! capabilities.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::Backend;
use crate::errors::{ModGraphError, Result};
use crate::format::{
    format_dependency_graph, format_module_listing, format_package_listing,
    format_symbol_listing, to_json,
};
use crate::types::{
    DependencyGraphOptions, FilterSymbolsOptions, ListModulesOptions, ListPackagesOptions,
};
use crate::workspace::Workspace;

/// A tool definition exposed to MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Returns the list of all tool definitions.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    let dir = json!({
        "type": "string",
        "description": "Workspace directory (default: the default workspace)"
    });
    let format = json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "description": "Output format (default: markdown)"
    });

    vec![
        ToolDefinition {
            name: "modgraph_list_modules".to_string(),
            description: "List the main module and its required modules, split into internal and external modules.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dir": dir.clone(),
                    "direct_only": {
                        "type": "boolean",
                        "description": "Drop requirements marked // indirect (default: true)"
                    },
                    "format": format.clone()
                }
            }),
        },
        ToolDefinition {
            name: "modgraph_list_module_packages".to_string(),
            description: "List the packages of a module (the main module by default).".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dir": dir.clone(),
                    "module_path": {
                        "type": "string",
                        "description": "Module path (default: the main module)"
                    },
                    "exclude_tests": {
                        "type": "boolean",
                        "description": "Skip test packages"
                    },
                    "exclude_internal": {
                        "type": "boolean",
                        "description": "Skip packages under an internal/ directory"
                    },
                    "top_level_only": {
                        "type": "boolean",
                        "description": "Only the module root and its direct child packages"
                    },
                    "format": format.clone()
                }
            }),
        },
        ToolDefinition {
            name: "modgraph_dependency_graph".to_string(),
            description: "Resolve the packages a package imports and the packages that import it.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dir": dir.clone(),
                    "package_path": {
                        "type": "string",
                        "description": "Import path of the package (default: the main module root)"
                    },
                    "include_transitive": {
                        "type": "boolean",
                        "description": "Follow imports of imports"
                    },
                    "max_depth": {
                        "type": "integer",
                        "description": "Maximum levels of dependencies; 0 means unbounded"
                    },
                    "format": format.clone()
                }
            }),
        },
        ToolDefinition {
            name: "modgraph_filter_symbols".to_string(),
            description: "Return the exported symbols of a package matching name/receiver filters.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "dir": dir.clone(),
                    "package_path": {
                        "type": "string",
                        "description": "Import path of the package"
                    },
                    "filters": {
                        "type": "array",
                        "description": "Symbols to select; a method filter may name its receiver, e.g. *Server",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "receiver": { "type": "string" }
                            },
                            "required": ["name"]
                        }
                    },
                    "include_docs": {
                        "type": "boolean",
                        "description": "Include doc comments"
                    },
                    "include_bodies": {
                        "type": "boolean",
                        "description": "Include declaration bodies"
                    },
                    "format": format.clone()
                },
                "required": ["package_path", "filters"]
            }),
        },
    ]
}

/// Dispatches a tool call to the matching workspace query.
///
/// Returns the tool result as an MCP text content value, or an error if the
/// tool name is unknown, the arguments are malformed, or the query fails.
pub fn handle_tool_call<B: Backend>(
    ws: &Workspace<B>,
    tool_name: &str,
    args: Value,
) -> Result<Value> {
    let as_json = args.get("format").and_then(|v| v.as_str()) == Some("json");
    let limit = ws.config().max_response_chars;

    let output = match tool_name {
        "modgraph_list_modules" => {
            let opts: ListModulesOptions = parse_args(args)?;
            let listing = ws.list_modules(&opts)?;
            render(&listing, as_json, format_module_listing)?
        }
        "modgraph_list_module_packages" => {
            let opts: ListPackagesOptions = parse_args(args)?;
            let listing = ws.list_module_packages(&opts)?;
            render(&listing, as_json, format_package_listing)?
        }
        "modgraph_dependency_graph" => {
            let opts: DependencyGraphOptions = parse_args(args)?;
            let graph = ws.resolve_dependency_graph(&opts)?;
            render(&graph, as_json, format_dependency_graph)?
        }
        "modgraph_filter_symbols" => {
            let opts: FilterSymbolsOptions = parse_args(args)?;
            let listing = ws.filter_symbols(&opts)?;
            render(&listing, as_json, format_symbol_listing)?
        }
        _ => {
            return Err(ModGraphError::invalid_argument(format!(
                "unknown tool: {}",
                tool_name
            )))
        }
    };

    Ok(json!({
        "content": [{ "type": "text", "text": truncate_response(&output, limit) }]
    }))
}

/// Deserializes tool arguments; a missing argument object means "all defaults".
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|e| ModGraphError::invalid_argument(format!("malformed arguments: {}", e)))
}

fn render<T: Serialize>(value: &T, as_json: bool, markdown: fn(&T) -> String) -> Result<String> {
    if as_json {
        to_json(value)
    } else {
        Ok(markdown(value))
    }
}

/// Truncates a string to `max_chars` bytes, appending a truncation notice
/// if necessary.
fn truncate_response(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        s.to_string()
    } else {
        // Find a valid UTF-8 character boundary at or before max_chars
        let mut end = max_chars;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}\n\n[... truncated at {} chars]", &s[..end], end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definitions_complete() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 4);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert!(tool_names.contains(&"modgraph_list_modules"));
        assert!(tool_names.contains(&"modgraph_list_module_packages"));
        assert!(tool_names.contains(&"modgraph_dependency_graph"));
        assert!(tool_names.contains(&"modgraph_filter_symbols"));
    }

    #[test]
    fn test_tool_definitions_have_schemas() {
        for tool in &get_tool_definitions() {
            assert!(!tool.description.is_empty());
            assert_eq!(tool.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_truncate_short_response() {
        assert_eq!(truncate_response("hello world", 100), "hello world");
    }

    #[test]
    fn test_truncate_long_response() {
        let long = "x".repeat(20_000);
        let result = truncate_response(&long, 15_000);
        assert!(result.len() < 20_000);
        assert!(result.contains("[... truncated at 15000 chars]"));
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let s = "é".repeat(10);
        let result = truncate_response(&s, 5);
        assert!(result.starts_with("éé\n"));
        assert!(result.contains("[... truncated at 4 chars]"));
    }

    #[test]
    fn test_parse_null_args_uses_defaults() {
        let opts: ListModulesOptions = parse_args(Value::Null).unwrap();
        assert_eq!(opts, ListModulesOptions::default());
    }

    #[test]
    fn test_max_depth_declared_as_integer() {
        let tools = get_tool_definitions();
        let graph = tools
            .iter()
            .find(|t| t.name == "modgraph_dependency_graph")
            .unwrap();
        assert_eq!(
            graph.input_schema["properties"]["max_depth"]["type"],
            "integer"
        );
    }
}

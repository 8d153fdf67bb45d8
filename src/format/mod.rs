/// Markdown and JSON rendering of query results.
pub mod formatter;

pub use formatter::{
    format_dependency_graph, format_module_listing, format_package_listing,
    format_symbol_listing, to_json,
};

pub mod backend;
pub mod config;
pub mod errors;
pub mod format;
pub mod graph;
pub mod manifest;
pub mod mcp;
pub mod symbols;
pub mod types;
pub mod workspace;

use serde::Serialize;

use crate::errors::Result;
use crate::types::{
    DependencyGraph, ModuleListing, ModuleRecord, PackageListing, Symbol, SymbolListing,
};

/// Formats a module listing as Markdown: main module, then the internal and
/// external sections in listing order.
pub fn format_module_listing(listing: &ModuleListing) -> String {
    let mut out = String::new();

    out.push_str("## Modules\n");
    out.push_str(&format!("**Main module:** {}\n\n", listing.main_module));

    out.push_str(&format!("### Internal ({})\n", listing.internal.len()));
    for module in &listing.internal {
        out.push_str(&format_module_line(module));
    }
    out.push('\n');

    out.push_str(&format!("### External ({})\n", listing.external.len()));
    if listing.external.is_empty() {
        out.push_str("_No external modules._\n");
    } else {
        for module in &listing.external {
            out.push_str(&format_module_line(module));
        }
    }

    out
}

fn format_module_line(module: &ModuleRecord) -> String {
    let mut line = format!("- {}", module.path);
    if !module.version.is_empty() {
        line.push_str(&format!(" {}", module.version));
    }
    if module.is_main {
        line.push_str(" (main)");
    }
    if module.is_indirect {
        line.push_str(" (indirect)");
    }
    if let Some(ref old) = module.replaces {
        line.push_str(&format!(" (replaces {})", old));
    }
    if let Some(ref dir) = module.local_file_path {
        line.push_str(&format!(" => {}", dir.display()));
    }
    line.push('\n');
    line
}

/// Formats the packages of a module as Markdown, one line per package.
pub fn format_package_listing(listing: &PackageListing) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Packages in {}\n", listing.module_path));
    if listing.packages.is_empty() {
        out.push_str("_No packages found._\n");
        return out;
    }

    for pkg in &listing.packages {
        let files = if pkg.file_count == 1 { "file" } else { "files" };
        out.push_str(&format!(
            "- {} ({}, {} {})",
            pkg.path, pkg.name, pkg.file_count, files
        ));
        if pkg.is_test {
            out.push_str(" [test]");
        }
        out.push('\n');
    }

    out
}

/// Formats a dependency graph as Markdown.
///
/// Dependencies are indented by depth and tagged `[stdlib]` or `[external]`;
/// dependents are tagged `[test]` when they are test packages.
pub fn format_dependency_graph(graph: &DependencyGraph) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Dependency graph of {}\n", graph.package));

    out.push_str(&format!("### Dependencies ({})\n", graph.dependencies.len()));
    if graph.dependencies.is_empty() {
        out.push_str("_No dependencies._\n");
    } else {
        for edge in &graph.dependencies {
            let indent = "  ".repeat(edge.depth as usize);
            out.push_str(&format!("{}- {}", indent, edge.path));
            if edge.is_stdlib {
                out.push_str(" [stdlib]");
            } else if edge.is_external {
                out.push_str(" [external]");
            }
            if !edge.module.is_empty() && !edge.is_stdlib {
                out.push_str(&format!(" (module {})", edge.module));
            }
            out.push('\n');
        }
    }
    out.push('\n');

    out.push_str(&format!("### Dependents ({})\n", graph.dependents.len()));
    if graph.dependents.is_empty() {
        out.push_str("_No dependents._\n");
    } else {
        for edge in &graph.dependents {
            out.push_str(&format!("- {}", edge.path));
            if edge.is_test {
                out.push_str(" [test]");
            }
            out.push('\n');
        }
    }

    out
}

/// Formats matched symbols as Markdown, including docs and bodies when present.
pub fn format_symbol_listing(listing: &SymbolListing) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Symbols in {}\n", listing.package));
    if listing.symbols.is_empty() {
        out.push_str("_No matching symbols._\n");
        return out;
    }

    for symbol in &listing.symbols {
        out.push_str(&format_symbol(symbol));
    }

    out
}

fn format_symbol(symbol: &Symbol) -> String {
    let mut out = String::new();

    let kind = match symbol.receiver() {
        Some(receiver) => format!("method on {}", receiver),
        None => symbol.kind.as_str().to_string(),
    };
    out.push_str(&format!(
        "- **{}** ({}) - {}:{}\n",
        symbol.name, kind, symbol.file_path, symbol.line
    ));
    if !symbol.signature.is_empty() {
        out.push_str(&format!("  `{}`\n", symbol.signature));
    }
    if let Some(ref doc) = symbol.doc {
        for line in doc.lines() {
            out.push_str(&format!("  > {}\n", line));
        }
    }
    if let Some(ref body) = symbol.body {
        out.push_str("  ```go\n");
        for line in body.lines() {
            out.push_str(&format!("  {}\n", line));
        }
        out.push_str("  ```\n");
    }

    out
}

/// Renders any result as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

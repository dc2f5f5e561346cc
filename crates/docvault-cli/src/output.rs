//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use docvault_core::types::Node;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print a forest as an indented tree, or as JSON.
pub fn print_tree(roots: &[Node], format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(&roots);
        return;
    }
    if roots.is_empty() {
        println!("Storage root is empty.");
        return;
    }
    for line in render_tree(roots) {
        println!("{line}");
    }
}

/// One line per node, children indented under their parent.
pub fn render_tree(roots: &[Node]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack: Vec<(&Node, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let suffix = if node.is_folder() { "/" } else { "" };
        lines.push(format!("{}{}{}", "  ".repeat(depth), node.name, suffix));
        stack.extend(node.children().iter().rev().map(|c| (c, depth + 1)));
    }
    lines
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

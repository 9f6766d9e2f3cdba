use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use typeval_types::{TypeGraph, load};

/// Read input from file path or stdin.
/// - `"-"` reads from stdin
/// - anything else reads from file
pub fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Error reading from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(file).with_context(|| format!("Error reading file: {file}"))
    }
}

/// Helper to get display path for error messages
pub fn display_path(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

/// Read and load a type graph.
pub fn load_graph(file: &str) -> anyhow::Result<TypeGraph> {
    let contents = read_input(file)?;
    load::from_str(&contents)
        .with_context(|| format!("Error loading type graph from {}", display_path(file)))
}

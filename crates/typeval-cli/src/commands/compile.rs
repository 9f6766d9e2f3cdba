//! Compile command - compiles one named type of a graph into a schema.

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::ValueEnum;
use tracing::info;
use typeval_compile::{Compiler, SchemaNode};
use typeval_config::{OutputFormat, TypevalConfig};

use crate::util::{display_path, load_graph};

/// Output format override
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Format {
    /// JSON document
    Json,
    /// JavaScript object literal
    Source,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Source => OutputFormat::Source,
        }
    }
}

#[derive(clap::Args)]
pub struct Args {
    /// Path to the type graph JSON file (use - for stdin)
    pub graph: String,
    /// Name of the type to compile
    #[arg(short, long)]
    pub root: String,
    /// Path to Typeval.toml (searched upward from the current directory if omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,
    /// Pretty print the output
    #[arg(short, long)]
    pub pretty: bool,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Error reading current directory")?;
    let config =
        TypevalConfig::resolve(args.config.as_deref(), &cwd).context("Error loading config")?;

    let graph = load_graph(&args.graph)?;
    let root = graph.lookup(&args.root).ok_or_else(|| {
        anyhow!(
            "type `{}` is not defined in {}",
            args.root,
            display_path(&args.graph)
        )
    })?;

    let schema = Compiler::with_options(&graph, config.compile)
        .compile(root)
        .with_context(|| format!("Error compiling `{}`", args.root))?;

    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);
    let rendered = render(&schema, format, args.pretty || config.output.pretty)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{rendered}\n"))
                .with_context(|| format!("Error writing {}", path.display()))?;
            info!(path = %path.display(), "schema written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn render(schema: &SchemaNode, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    Ok(match (format, pretty) {
        (OutputFormat::Json, false) => serde_json::to_string(schema)?,
        (OutputFormat::Json, true) => serde_json::to_string_pretty(schema)?,
        (OutputFormat::Source, false) => schema.to_source(),
        (OutputFormat::Source, true) => schema.to_source_pretty(),
    })
}

#[cfg(test)]
mod tests {
    use typeval_types::{Property, TypeGraph, builtin};

    use super::*;

    fn schema() -> SchemaNode {
        let mut builder = TypeGraph::builder();
        let file = builder.record(
            "File",
            vec![
                Property::required("data", builtin::STRING),
                Property::optional("size", builtin::NUMBER),
            ],
        );
        let graph = builder.build().unwrap();
        Compiler::new(&graph).compile(file).unwrap()
    }

    #[test]
    fn test_render_json() {
        assert_eq!(
            render(&schema(), OutputFormat::Json, false).unwrap(),
            r#"{"data":{"type":"string"},"size":{"type":"number","optional":true}}"#
        );
    }

    #[test]
    fn test_render_source() {
        assert_eq!(
            render(&schema(), OutputFormat::Source, false).unwrap(),
            r#"{ data: { type: "string" }, size: { type: "number", optional: true } }"#
        );
    }
}

//! Mindmark - A terminal mind-map editor for Markdown outlines.
//!
//! # Usage
//!
//! ```bash
//! mindmark plan.md
//! mindmark --tree-style ascii --tree-focus plan.md
//! mindmark --print notes.md
//! mindmark --json notes.md
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mindmark::app::{App, DEFAULT_FILE_NAME, read_outline};
use mindmark::config::{
    ConfigFlags, TreeStyle, clear_config_flags, global_config_path, load_layered,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use mindmark::outline::{Dialect, LineIndex, NodeId, SyncEngine, Tree};
use mindmark::perf;

/// A terminal mind-map editor that keeps a Markdown outline and its tree in sync
#[derive(Parser, Debug)]
#[command(name = "mindmark", version, about, long_about = None)]
struct Cli {
    /// Outline file to edit (created on first save)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the canonical list form of FILE and exit
    #[arg(long, conflicts_with = "json")]
    print: bool,

    /// Print the tree of FILE as JSON and exit
    #[arg(long)]
    json: bool,

    /// Start with the tree pane hidden
    #[arg(long)]
    no_tree: bool,

    /// Start with keyboard focus in the tree pane
    #[arg(long)]
    tree_focus: bool,

    /// Characters used for tree guides
    #[arg(long, value_enum)]
    tree_style: Option<TreeStyle>,

    /// Log timing scopes at debug level
    #[arg(long)]
    perf: bool,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    dialect: Option<Dialect>,
    root: Option<JsonNode<'a>>,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    id: u64,
    label: &'a str,
    line: Option<usize>,
    #[serde(rename = "virtual")]
    is_virtual: bool,
    font_size: Option<u16>,
    font_color: Option<&'a str>,
    children: Vec<Self>,
}

fn json_node<'a>(tree: &'a Tree, index: &LineIndex, id: NodeId) -> Option<JsonNode<'a>> {
    let node = tree.get(id)?;
    Some(JsonNode {
        id: id.get(),
        label: node.label(),
        line: index.line_of_node(id),
        is_virtual: node.is_virtual(),
        font_size: node.font_size(),
        font_color: node.font_color(),
        children: node
            .children()
            .iter()
            .filter_map(|&child| json_node(tree, index, child))
            .collect(),
    })
}

fn init_logging(flags: &ConfigFlags) -> Result<()> {
    let default_level = if flags.perf { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(path) = &flags.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn json_document(engine: &SyncEngine) -> JsonDocument<'_> {
    let tree = engine.tree();
    JsonDocument {
        title: tree.title(),
        dialect: engine.dialect(),
        root: tree
            .root()
            .and_then(|root| json_node(tree, engine.index(), root)),
    }
}

fn print_outline(path: &Path, as_json: bool) -> Result<()> {
    let text = read_outline(path)?;
    let engine = SyncEngine::from_text(&text);
    let mut out = std::io::stdout().lock();

    if as_json {
        serde_json::to_writer_pretty(&mut out, &json_document(&engine))
            .context("Failed to encode JSON")?;
    } else {
        out.write_all(engine.canonical_text().as_bytes())?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
        eprintln!("Cleared defaults in {}", global_path.display());
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
        eprintln!("Saved defaults to {}", global_path.display());
    }
    if cli.save || cli.clear {
        return Ok(());
    }

    let effective = load_layered(&global_path, &local_path)?.union(&cli_flags);
    init_logging(&effective)?;
    perf::set_enabled(effective.perf);
    tracing::debug!(?effective, "effective flags");

    let file = cli
        .file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));

    if cli.print || cli.json {
        return print_outline(&file, cli.json);
    }

    let mut app = App::new(file)
        .with_tree_visible(!effective.no_tree)
        .with_tree_focus(effective.tree_focus)
        .with_tree_style(effective.tree_style.unwrap_or_default())
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}

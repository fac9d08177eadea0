//! specnav: an outline navigator for resolved API description documents.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use specnav::channels::{ElementHandle, HistoryChannel, RenderSurface};
use specnav::{config, document, resolved, store};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "specnav")]
#[command(about = "Synchronized outline navigation for API reference documents", long_about = None)]
struct Args {
    /// Resolved API description to load (JSON)
    #[arg(value_name = "DOCUMENT")]
    path: PathBuf,

    /// Simulate navigating to this hash before printing the outline
    #[arg(long)]
    hash: Option<String>,

    /// Expand these response codes ("all" expands every response)
    #[arg(long, short = 'r', value_name = "CODE")]
    expand_responses: Vec<String>,

    /// Print node ids alongside names
    #[arg(long)]
    ids: bool,
}

/// Render surface for a headless outline print: nothing is laid out, so
/// lookups resolve to nothing and scrolling is a no-op.
struct HeadlessSurface;

impl RenderSurface for HeadlessSurface {
    fn lookup(&self, _id: &str) -> Option<ElementHandle> {
        None
    }

    fn is_above(&self, _el: ElementHandle) -> bool {
        false
    }

    fn is_below(&self, _el: ElementHandle) -> bool {
        false
    }

    fn scroll_into_view(&mut self, _el: ElementHandle) {}

    fn scroll_to_id(&mut self, _id: &str) {}
}

/// History backed by a plain string slot, seeded from `--hash`.
struct CliHistory {
    current: String,
}

impl HistoryChannel for CliHistory {
    fn current_id(&self) -> String {
        self.current.clone()
    }

    fn replace(&mut self, id: &str, _rewrite: bool) {
        self.current = id.to_owned();
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.expand_responses.is_empty() {
        cfg.expand_responses = args.expand_responses.clone();
    }

    let doc = resolved::Document::load(&args.path).map_err(io::Error::other)?;
    let tree = document::DocumentTree::build(&doc, &cfg).map_err(io::Error::other)?;

    if tree.is_empty() {
        eprintln!("No nodes found in document");
        return Ok(());
    }

    let history = CliHistory {
        current: args.hash.clone().unwrap_or_default(),
    };
    let mut menu = store::MenuStore::new(tree, &cfg, Box::new(HeadlessSurface), Box::new(history));

    if args.hash.is_some() {
        menu.update_on_history(None);
    }

    for (pos, &idx) in menu.flat_items().iter().enumerate() {
        let node = menu.tree().node(idx);
        let marker = if menu.active_idx() == Some(pos) { '>' } else { ' ' };
        let hidden = if menu.is_visible(pos) { "" } else { " (hidden)" };
        let indent = "  ".repeat(node.depth);
        if args.ids {
            println!("{marker} {indent}{} [{}]{hidden}", node.name, node.id);
        } else {
            println!("{marker} {indent}{}{hidden}", node.name);
        }
    }

    Ok(())
}

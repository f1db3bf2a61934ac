// ABOUTME: Subcommand implementations for the tiler binary.
// ABOUTME: Each command loads a layout file into a fresh tree, acts on it and renders text output.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tiler_core::Config;
use tiler_layout::{
    Dimension, LayoutListener, LayoutTree, Pane, PaneConfig, PaneId, PaneRecord, Point, Position,
    Size,
};

use crate::cli::Commands;

/// Logs every committed layout change.
struct TraceListener;

impl LayoutListener for TraceListener {
    fn on_add(&mut self, pane: &Pane) {
        tracing::debug!("Pane {} ({}) added at {:?}", pane.id(), pane.kind(), pane.size());
    }

    fn on_remove(&mut self, pane: &Pane) {
        tracing::info!("Pane {} ({}) closed", pane.id(), pane.kind());
    }

    fn on_drag(&mut self, pane: &Pane, delta: f64) {
        tracing::info!("Divider of {} moved {:.1}px", pane.id(), delta);
    }
}

pub fn run(config: &Config, command: Commands) -> Result<String> {
    match command {
        Commands::New { width, height } => {
            let container = Size::new(width.unwrap_or(config.width), height.unwrap_or(config.height));
            let tree = LayoutTree::new(container, config.layout.clone());
            render_json(&tree)
        }
        Commands::Inspect { file, width, height } => {
            let tree = open(&file, config, width, height)?;
            Ok(describe(&tree))
        }
        Commands::Split {
            file,
            target,
            position,
            size,
            fixed,
            kind,
        } => {
            let mut tree = open(&file, config, None, None)?;
            split(&mut tree, PaneId(target), position, size, fixed, kind)?;
            render_json(&tree)
        }
        Commands::Close { file, pane } => {
            let mut tree = open(&file, config, None, None)?;
            tree.remove(PaneId(pane))
                .with_context(|| format!("Failed to close pane {pane}"))?;
            render_json(&tree)
        }
        Commands::Drag { file, pane, delta } => {
            let mut tree = open(&file, config, None, None)?;
            drag(&mut tree, PaneId(pane), delta)?;
            render_json(&tree)
        }
        Commands::Rescale { file, width, height } => {
            let mut tree = open(&file, config, None, None)?;
            tree.resize(Size::new(width, height));
            render_json(&tree)
        }
    }
}

/// Load `path` into a new tree, at its saved size unless overridden.
fn open(path: &Path, config: &Config, width: Option<f64>, height: Option<f64>) -> Result<LayoutTree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout {}", path.display()))?;
    let record: PaneRecord = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse layout {}", path.display()))?;

    let [saved_width, saved_height] = record.dimensions;
    let container = Size::new(width.unwrap_or(saved_width), height.unwrap_or(saved_height));
    let mut tree = LayoutTree::new(container, config.layout.clone()).with_listener(Box::new(TraceListener));
    tree.restore(record, container)
        .with_context(|| format!("Failed to load layout {}", path.display()))?;
    Ok(tree)
}

fn split(
    tree: &mut LayoutTree,
    target: PaneId,
    position: Position,
    size: f64,
    fixed: bool,
    kind: Option<String>,
) -> Result<PaneId> {
    let pane = PaneConfig {
        kind,
        fixed,
        ..PaneConfig::default()
    };
    let id = tree
        .add(pane, target, position, size, false)
        .with_context(|| format!("Failed to split pane {}", target.0))?;
    Ok(id)
}

/// Drive a whole drag of the divider of `id` by `delta` pixels.
fn drag(tree: &mut LayoutTree, id: PaneId, delta: f64) -> Result<f64> {
    let Some(dimension) = tree.pane(id).and_then(|p| p.split()).map(|s| s.dimension()) else {
        bail!("Pane {} has no divider", id.0);
    };
    let Some(bar) = tree.divider_rect(id) else {
        bail!("Pane {} is not laid out", id.0);
    };

    let grab = bar.origin();
    tree.start_drag(id, grab)
        .with_context(|| format!("Failed to drag divider of pane {}", id.0))?;
    let release = match dimension {
        Dimension::Width => Point::new(grab.x + delta, grab.y),
        Dimension::Height => Point::new(grab.x, grab.y + delta),
    };
    tree.move_drag(release);
    match tree.end_drag() {
        Some(moved) => Ok(moved),
        None => bail!("Drag of pane {} ended without moving", id.0),
    }
}

fn render_json(tree: &LayoutTree) -> Result<String> {
    serde_json::to_string_pretty(&tree.snapshot()).context("Failed to serialize layout")
}

/// Indented tree view, one pane per line, followed by invariant problems.
fn describe(tree: &LayoutTree) -> String {
    let rects = tree.rects();
    let mut out = String::new();
    let mut depth_of = std::collections::BTreeMap::new();

    tree.walk(tree.root(), &mut |pane| {
        let depth = pane
            .parent()
            .and_then(|parent| depth_of.get(&parent).copied())
            .map_or(0, |d: usize| d + 1);
        depth_of.insert(pane.id(), depth);

        let rect = rects.get(&pane.id()).copied().unwrap_or_default();
        let _ = write!(
            out,
            "{:indent$}{} {} {}x{} at ({}, {})",
            "",
            pane.id(),
            pane.kind(),
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            indent = depth * 2
        );
        if let Some(split) = pane.split() {
            let dimension = match split.dimension() {
                Dimension::Width => "width",
                Dimension::Height => "height",
            };
            let _ = write!(out, " split:{dimension}");
            if !split.divider().is_resizable() {
                out.push_str(" static");
            }
        }
        if pane.is_fixed() {
            out.push_str(" fixed");
        }
        if pane.config().permanent {
            out.push_str(" permanent");
        }
        out.push('\n');
    });

    let issues = tree.check_invariants(1.0);
    if issues.is_empty() {
        out.push_str("layout is consistent\n");
    } else {
        for issue in issues {
            let _ = writeln!(out, "problem: {issue}");
        }
    }
    out
}

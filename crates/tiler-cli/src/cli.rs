// ABOUTME: Command-line argument types for the tiler binary.
// ABOUTME: Pane numbers are the ids a layout file gets when loaded, as listed by `inspect`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tiler_layout::Position;

/// Inspect and edit binary tiling layout files
#[derive(Parser, Debug)]
#[command(name = "tiler")]
#[command(author, version, about = "Inspect and edit tiling layout files")]
pub struct Cli {
    /// Path to a config.toml with layout options
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a fresh layout holding a single pane
    New {
        #[arg(long)]
        width: Option<f64>,

        #[arg(long)]
        height: Option<f64>,
    },

    /// Show the pane tree with pixel rectangles and any invariant problems
    Inspect {
        file: PathBuf,

        /// Lay out at this width instead of the saved one
        #[arg(long)]
        width: Option<f64>,

        /// Lay out at this height instead of the saved one
        #[arg(long)]
        height: Option<f64>,
    },

    /// Split a pane and print the new layout
    Split {
        file: PathBuf,

        /// Pane to split
        #[arg(short, long)]
        target: u64,

        /// Side of the target the new pane goes on
        #[arg(short, long, value_parser = parse_position)]
        position: Position,

        /// Size of the new pane in pixels along the split
        #[arg(short, long)]
        size: f64,

        /// Keep the new pane's size when the container changes
        #[arg(long)]
        fixed: bool,

        /// Pane type stored in its configuration
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Close a pane and print the new layout
    Close {
        file: PathBuf,

        #[arg(short, long)]
        pane: u64,
    },

    /// Drag the divider of a split pane and print the new layout
    Drag {
        file: PathBuf,

        /// Split pane whose divider moves
        #[arg(short, long)]
        pane: u64,

        /// Pixels to move the divider, negative toward the first child
        #[arg(short, long, allow_hyphen_values = true)]
        delta: f64,
    },

    /// Load a layout at its saved size, then resize the container
    Rescale {
        file: PathBuf,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,
    },
}

fn parse_position(value: &str) -> Result<Position, String> {
    value.parse()
}

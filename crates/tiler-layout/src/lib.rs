// ABOUTME: Binary tiling layout engine: a tree of panes that always fills its container.
// ABOUTME: Splitting, closing, resizing, divider drags and JSON save/load.

pub mod codec;
pub mod debounce;
pub mod divider;
pub mod error;
pub mod geometry;
pub mod hooks;
mod mutate;
pub mod pane;
pub mod sizing;
pub mod tree;

pub use codec::PaneRecord;
pub use debounce::ResizeDebouncer;
pub use divider::{Divider, DragState};
pub use error::LayoutError;
pub use geometry::{Dimension, Point, Position, Rect, Size, Stacking};
pub use hooks::{LayoutListener, NoopListener};
pub use pane::{Pane, PaneConfig, PaneId, SizeMode, Split};
pub use sizing::SizePlan;
pub use tree::{InvariantIssue, InvariantKind, LayoutTree};

pub use tiler_core::{HandleGeometry, LayoutOptions};

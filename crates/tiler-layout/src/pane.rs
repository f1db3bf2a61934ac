// ABOUTME: Pane nodes stored in the layout arena.
// ABOUTME: A pane is a leaf or a split owning exactly two children and one divider.

use serde::{Deserialize, Serialize};

use crate::divider::Divider;
use crate::geometry::{Dimension, Position, Size, Stacking};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(pub u64);

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a pane reacts to deltas routed to it by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMode {
    Proportional,
    Fixed,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Per-pane configuration carried through save/load.
///
/// The recognized keys are typed; anything else an application stores on a
/// pane lands in `extra` and is written back out unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Permanent panes cannot be removed
    #[serde(default, skip_serializing_if = "is_false")]
    pub permanent: bool,

    /// Keep this pane's size along its parent's split dimension
    #[serde(default, skip_serializing_if = "is_false")]
    pub fixed: bool,

    /// Refuse new panes split off this one
    #[serde(default, skip_serializing_if = "is_false")]
    pub noadd: bool,

    /// `Some(false)` makes the divider of this pane static
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divider: Option<bool>,

    /// Requested size when the pane was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    /// Requested position when the pane was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaneConfig {
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    pub fn noadd(mut self) -> Self {
        self.noadd = true;
        self
    }

    pub fn static_divider(mut self) -> Self {
        self.divider = Some(false);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Structure of an internal pane.
#[derive(Debug, Clone)]
pub struct Split {
    pub(crate) dimension: Dimension,
    pub(crate) children: [PaneId; 2],
    pub(crate) divider: Divider,
}

impl Split {
    pub(crate) fn new(dimension: Dimension, children: [PaneId; 2], resizable: bool) -> Self {
        Self {
            dimension,
            children,
            divider: Divider::new(dimension, resizable),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn children(&self) -> [PaneId; 2] {
        self.children
    }

    pub fn first(&self) -> PaneId {
        self.children[0]
    }

    pub fn second(&self) -> PaneId {
        self.children[1]
    }

    pub fn divider(&self) -> &Divider {
        &self.divider
    }

    /// Index of `child` in this split
    pub fn slot_of(&self, child: PaneId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }
}

#[derive(Debug, Clone)]
pub struct Pane {
    pub(crate) id: PaneId,
    pub(crate) parent: Option<PaneId>,
    pub(crate) split: Option<Split>,
    pub(crate) size: Size,
    pub(crate) config: PaneConfig,
    pub(crate) stacking: Stacking,
}

impl Pane {
    /// Create a detached leaf. The configuration id is overwritten with the
    /// runtime id so the two never disagree.
    pub(crate) fn new(id: PaneId, mut config: PaneConfig, size: Size) -> Self {
        config.id = Some(id.0);
        Self {
            id,
            parent: None,
            split: None,
            size,
            config,
            stacking: Stacking::Inherit,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    /// Type tag, `default` when the configuration names none
    pub fn kind(&self) -> &str {
        self.config.kind.as_deref().unwrap_or("default")
    }

    pub fn parent(&self) -> Option<PaneId> {
        self.parent
    }

    pub fn split(&self) -> Option<&Split> {
        self.split.as_ref()
    }

    pub fn children(&self) -> Option<[PaneId; 2]> {
        self.split.as_ref().map(|s| s.children)
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn config(&self) -> &PaneConfig {
        &self.config
    }

    pub fn size_mode(&self) -> SizeMode {
        if self.config.fixed {
            SizeMode::Fixed
        } else {
            SizeMode::Proportional
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.size_mode() == SizeMode::Fixed
    }

    pub fn stacking(&self) -> Stacking {
        self.stacking
    }

    pub fn divider(&self) -> Option<&Divider> {
        self.split.as_ref().map(|s| &s.divider)
    }
}

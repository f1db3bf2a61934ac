// ABOUTME: Arena-backed binary tree of panes filling one container.
// ABOUTME: Owns per-tree options, the listener, geometry queries and container resizing.

use std::collections::BTreeMap;
use std::time::Instant;

use tiler_core::LayoutOptions;

use crate::debounce::ResizeDebouncer;
use crate::error::LayoutError;
use crate::geometry::{Dimension, Point, Rect, Size};
use crate::hooks::{LayoutListener, NoopListener};
use crate::pane::{Pane, PaneConfig, PaneId};
use crate::sizing::{self, Arena};

pub struct LayoutTree {
    pub(crate) panes: Arena,
    pub(crate) root: PaneId,
    pub(crate) next_id: u64,
    pub(crate) container: Size,
    pub(crate) options: LayoutOptions,
    pub(crate) listener: Box<dyn LayoutListener>,
    pub(crate) active_drag: Option<PaneId>,
    debouncer: ResizeDebouncer,
}

impl std::fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutTree")
            .field("root", &self.root)
            .field("panes", &self.panes.len())
            .field("container", &self.container)
            .field("active_drag", &self.active_drag)
            .finish_non_exhaustive()
    }
}

impl LayoutTree {
    /// Create a tree holding a single permanent root pane that fills `container`.
    pub fn new(container: Size, options: LayoutOptions) -> Self {
        let root = PaneId(0);
        let config = PaneConfig::of_type("root").permanent();
        let mut panes = Arena::new();
        panes.insert(root, Pane::new(root, config, container));

        Self {
            panes,
            root,
            next_id: 1,
            container,
            debouncer: ResizeDebouncer::new(options.resize_debounce()),
            options,
            listener: Box::new(NoopListener),
            active_drag: None,
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn LayoutListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn LayoutListener>) {
        self.listener = listener;
    }

    pub fn root(&self) -> PaneId {
        self.root
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.panes.contains_key(&id)
    }

    /// All panes in id order
    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.panes.values()
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Leaf pane ids, first to last in layout order
    pub fn leaves(&self) -> Vec<PaneId> {
        let mut result = Vec::new();
        self.walk(self.root, &mut |pane| {
            if pane.is_leaf() {
                result.push(pane.id);
            }
        });
        result
    }

    /// Pre-order walk starting at `id`
    pub fn walk(&self, id: PaneId, visit: &mut dyn FnMut(&Pane)) {
        let Some(pane) = self.panes.get(&id) else {
            return;
        };
        visit(pane);
        if let Some([first, second]) = pane.children() {
            self.walk(first, visit);
            self.walk(second, visit);
        }
    }

    /// Ids of `id` and everything below it
    pub fn subtree(&self, id: PaneId) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.walk(id, &mut |pane| ids.push(pane.id));
        ids
    }

    pub(crate) fn get(&self, id: PaneId) -> Result<&Pane, LayoutError> {
        self.panes.get(&id).ok_or(LayoutError::NotFound(id))
    }

    pub(crate) fn alloc_id(&mut self) -> PaneId {
        let id = PaneId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Swap in a fully built arena. Pending resizes were computed for the old
    /// tree and are dropped.
    pub(crate) fn install(&mut self, panes: Arena, root: PaneId, next_id: u64, container: Size) {
        self.panes = panes;
        self.root = root;
        self.next_id = next_id;
        self.container = container;
        self.active_drag = None;
        self.debouncer.cancel();
    }

    /// Pixel rectangles of every pane, laid out from the container origin
    pub fn rects(&self) -> BTreeMap<PaneId, Rect> {
        let mut result = BTreeMap::new();
        self.collect_rects(self.root, Point::default(), &mut result);
        result
    }

    pub fn rect(&self, id: PaneId) -> Option<Rect> {
        self.rects().get(&id).copied()
    }

    fn collect_rects(&self, id: PaneId, origin: Point, out: &mut BTreeMap<PaneId, Rect>) {
        let Some(pane) = self.panes.get(&id) else {
            return;
        };
        out.insert(id, Rect::from_size(origin, pane.size));

        if let Some(split) = pane.split() {
            let [first, second] = split.children();
            let first_extent = self
                .panes
                .get(&first)
                .map(|p| p.size.get(split.dimension()))
                .unwrap_or(0.0);
            let offset = first_extent + self.options.divider_thickness;
            let second_origin = match split.dimension() {
                Dimension::Width => Point::new(origin.x + offset, origin.y),
                Dimension::Height => Point::new(origin.x, origin.y + offset),
            };
            self.collect_rects(first, origin, out);
            self.collect_rects(second, second_origin, out);
        }
    }

    /// Bar between the two children of an internal pane
    pub fn divider_rect(&self, id: PaneId) -> Option<Rect> {
        let pane = self.panes.get(&id)?;
        let split = pane.split()?;
        let origin = self.rect(id)?.origin();
        let first = self.panes.get(&split.first())?;
        let dimension = split.dimension();
        let thickness = self.options.divider_thickness;
        let along = first.size.get(dimension);

        Some(match dimension {
            Dimension::Width => Rect {
                x: origin.x + along,
                y: origin.y,
                width: thickness,
                height: pane.size.height,
            },
            Dimension::Height => Rect {
                x: origin.x,
                y: origin.y + along,
                width: pane.size.width,
                height: thickness,
            },
        })
    }

    /// Grab handle centered on a divider, when handles are enabled
    pub fn handle_rect(&self, id: PaneId) -> Option<Rect> {
        let handles = self.options.handles?;
        let bar = self.divider_rect(id)?;
        let divider = self.panes.get(&id)?.divider()?;
        let size = divider.handle_size(&handles);
        Some(Rect {
            x: bar.x + (bar.width - size.width) / 2.0,
            y: bar.y + (bar.height - size.height) / 2.0,
            width: size.width,
            height: size.height,
        })
    }

    /// Grow `id` by `delta` pixels along `dimension`, redistributing the
    /// change through its children. Chainable.
    pub fn size(&mut self, id: PaneId, delta: f64, dimension: Dimension) -> Result<&mut Self, LayoutError> {
        self.get(id)?;
        if !delta.is_finite() {
            return Err(LayoutError::structural("size", id, "delta is not a finite number"));
        }
        sizing::plan(&self.panes, id, delta, dimension).apply(&mut self.panes);
        Ok(self)
    }

    /// Match the root to a new container size.
    pub fn resize(&mut self, container: Size) {
        if !container.is_finite() {
            tracing::warn!("Ignoring non-finite container size {:?}", container);
            return;
        }
        let container = Size::new(container.width.max(0.0), container.height.max(0.0));
        let old = self.container;

        for dimension in [Dimension::Height, Dimension::Width] {
            let delta = container.get(dimension) - old.get(dimension);
            if delta != 0.0 {
                sizing::plan_forced(&self.panes, self.root, delta, dimension).apply(&mut self.panes);
            }
        }

        self.container = container;
        tracing::debug!(
            "Container resized from {}x{} to {}x{}",
            old.width,
            old.height,
            container.width,
            container.height
        );
    }

    /// Note a container size change; the resize runs once the burst settles.
    pub fn schedule_resize(&mut self, container: Size, now: Instant) {
        self.debouncer.schedule(container, now);
    }

    /// Run the pending resize if its quiet window has passed.
    pub fn flush_resize(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(container) => {
                self.resize(container);
                true
            }
            None => false,
        }
    }

    /// When the pending resize becomes due, for scheduling a wakeup
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Check every structural and geometric invariant, allowing `tolerance`
    /// pixels of rounding drift.
    pub fn check_invariants(&self, tolerance: f64) -> Vec<InvariantIssue> {
        let mut issues = Vec::new();
        let thickness = self.options.divider_thickness;

        match self.panes.get(&self.root) {
            Some(root) => {
                if root.parent.is_some() {
                    issues.push(InvariantIssue::new(self.root, InvariantKind::RootHasParent));
                }
                if !root.config.permanent {
                    issues.push(InvariantIssue::new(self.root, InvariantKind::RootNotPermanent));
                }
                let off = (root.size.width - self.container.width)
                    .abs()
                    .max((root.size.height - self.container.height).abs());
                if off > tolerance {
                    issues.push(InvariantIssue::new(
                        self.root,
                        InvariantKind::RootSizeMismatch {
                            expected: self.container,
                            actual: root.size,
                        },
                    ));
                }
            }
            None => issues.push(InvariantIssue::new(self.root, InvariantKind::MissingPane)),
        }

        let reachable = self.subtree(self.root);
        if reachable.len() != self.panes.len() {
            for id in self.panes.keys().filter(|id| !reachable.contains(id)) {
                issues.push(InvariantIssue::new(*id, InvariantKind::Unreachable));
            }
        }

        for pane in self.panes.values() {
            if pane.size.width < 0.0 || pane.size.height < 0.0 {
                issues.push(InvariantIssue::new(pane.id, InvariantKind::NegativeSize(pane.size)));
            }

            let Some(split) = pane.split() else {
                continue;
            };
            let dimension = split.dimension();
            let mut children = Vec::with_capacity(2);
            for child_id in split.children() {
                match self.panes.get(&child_id) {
                    Some(child) => {
                        if child.parent != Some(pane.id) {
                            issues.push(InvariantIssue::new(child_id, InvariantKind::ParentLinkBroken));
                        }
                        children.push(child);
                    }
                    None => issues.push(InvariantIssue::new(child_id, InvariantKind::MissingPane)),
                }
            }
            let [a, b] = children[..] else {
                continue;
            };

            let expected = pane.size.get(dimension);
            let actual = a.size.get(dimension) + b.size.get(dimension) + thickness;
            if (expected - actual).abs() > tolerance {
                issues.push(InvariantIssue::new(
                    pane.id,
                    InvariantKind::SplitSumMismatch { expected, actual },
                ));
            }

            let cross = dimension.cross();
            for child in [a, b] {
                if (child.size.get(cross) - pane.size.get(cross)).abs() > tolerance {
                    issues.push(InvariantIssue::new(
                        child.id,
                        InvariantKind::CrossAxisMismatch {
                            expected: pane.size.get(cross),
                            actual: child.size.get(cross),
                        },
                    ));
                }
            }

            if a.is_fixed() && b.is_fixed() {
                issues.push(InvariantIssue::new(pane.id, InvariantKind::BothChildrenFixed));
            }
        }

        issues
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvariantIssue {
    pub pane: PaneId,
    pub kind: InvariantKind,
}

impl InvariantIssue {
    fn new(pane: PaneId, kind: InvariantKind) -> Self {
        Self { pane, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvariantKind {
    MissingPane,
    Unreachable,
    RootHasParent,
    RootNotPermanent,
    RootSizeMismatch { expected: Size, actual: Size },
    ParentLinkBroken,
    NegativeSize(Size),
    SplitSumMismatch { expected: f64, actual: f64 },
    CrossAxisMismatch { expected: f64, actual: f64 },
    BothChildrenFixed,
}

impl std::fmt::Display for InvariantIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            InvariantKind::MissingPane => write!(f, "pane {} is referenced but missing", self.pane),
            InvariantKind::Unreachable => write!(f, "pane {} is not reachable from the root", self.pane),
            InvariantKind::RootHasParent => write!(f, "root {} has a parent", self.pane),
            InvariantKind::RootNotPermanent => write!(f, "root {} is not permanent", self.pane),
            InvariantKind::RootSizeMismatch { expected, actual } => write!(
                f,
                "root {} is {}x{}, container is {}x{}",
                self.pane, actual.width, actual.height, expected.width, expected.height
            ),
            InvariantKind::ParentLinkBroken => write!(f, "pane {} points at the wrong parent", self.pane),
            InvariantKind::NegativeSize(size) => {
                write!(f, "pane {} has negative size {}x{}", self.pane, size.width, size.height)
            }
            InvariantKind::SplitSumMismatch { expected, actual } => write!(
                f,
                "children of {} add up to {actual:.2}, expected {expected:.2}",
                self.pane
            ),
            InvariantKind::CrossAxisMismatch { expected, actual } => write!(
                f,
                "pane {} spans {actual:.2} across its split, expected {expected:.2}",
                self.pane
            ),
            InvariantKind::BothChildrenFixed => write!(f, "both children of {} are fixed", self.pane),
        }
    }
}

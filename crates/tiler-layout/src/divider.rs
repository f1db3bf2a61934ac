// ABOUTME: Divider between the two children of a split and its drag lifecycle.
// ABOUTME: Idle -> Dragging -> Idle; only drag end changes pane sizes.

use tiler_core::HandleGeometry;

use crate::error::LayoutError;
use crate::geometry::{Dimension, Point, Size};
use crate::pane::PaneId;
use crate::sizing;
use crate::tree::LayoutTree;

/// Transient state of one divider.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position minus divider position when the drag started
        grab_offset: f64,
        /// Divider position when the drag started
        origin: f64,
        /// Where the drag indicator is drawn now
        indicator: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Divider {
    dimension: Dimension,
    resizable: bool,
    state: DragState,
}

impl Divider {
    pub(crate) fn new(dimension: Dimension, resizable: bool) -> Self {
        Self {
            dimension,
            resizable,
            state: DragState::Idle,
        }
    }

    /// Dimension the divider moves along
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Bars between side-by-side panes run top to bottom
    pub fn is_vertical(&self) -> bool {
        self.dimension == Dimension::Width
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Indicator position along the divider's axis while dragging
    pub fn indicator(&self) -> Option<f64> {
        match self.state {
            DragState::Dragging { indicator, .. } => Some(indicator),
            DragState::Idle => None,
        }
    }

    pub fn handle_size(&self, handles: &HandleGeometry) -> Size {
        if self.is_vertical() {
            Size::new(handles.height, handles.width)
        } else {
            Size::new(handles.width, handles.height)
        }
    }

    fn begin(&mut self, pointer: f64, position: f64) {
        self.state = DragState::Dragging {
            grab_offset: pointer - position,
            origin: position,
            indicator: position,
        };
    }

    fn track(&mut self, pointer: f64, bounds: Option<(f64, f64)>) -> Option<f64> {
        let DragState::Dragging {
            grab_offset,
            indicator,
            ..
        } = &mut self.state
        else {
            return None;
        };
        let mut next = pointer - *grab_offset;
        if let Some((min, max)) = bounds {
            next = next.clamp(min, max.max(min));
        }
        *indicator = next;
        Some(next)
    }

    /// Leave the drag, returning how far the indicator moved
    fn finish(&mut self) -> Option<f64> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                origin, indicator, ..
            } => Some(indicator - origin),
            DragState::Idle => None,
        }
    }
}

impl LayoutTree {
    /// Pane whose divider is being dragged
    pub fn active_drag(&self) -> Option<PaneId> {
        self.active_drag
    }

    /// Start dragging the divider of internal pane `id` from `pointer`.
    pub fn start_drag(&mut self, id: PaneId, pointer: Point) -> Result<(), LayoutError> {
        if self.active_drag.is_some() {
            return Err(LayoutError::structural("drag", id, "another divider is already being dragged"));
        }
        let pane = self.get(id)?;
        let Some(split) = pane.split() else {
            return Err(LayoutError::structural("drag", id, "pane has no divider"));
        };
        if !split.divider().is_resizable() {
            return Err(LayoutError::structural("drag", id, "divider is static"));
        }
        let dimension = split.dimension();
        let Some(bar) = self.divider_rect(id) else {
            return Err(LayoutError::structural("drag", id, "divider is not laid out"));
        };
        let position = bar.start(dimension);

        if let Some(divider) = self.divider_mut(id) {
            divider.begin(pointer.along(dimension), position);
        }
        self.active_drag = Some(id);
        self.listener.suppress_input();
        tracing::debug!("Drag started on {} at {:.1}", id, position);
        Ok(())
    }

    /// Move the drag indicator. Purely visual; returns the indicator position
    /// or None when no drag is active.
    pub fn move_drag(&mut self, pointer: Point) -> Option<f64> {
        let id = self.active_drag?;
        let bounds = if self.options.clamp_drag {
            self.drag_bounds(id)
        } else {
            None
        };
        let dimension = self.pane(id)?.split()?.dimension();
        self.divider_mut(id)?.track(pointer.along(dimension), bounds)
    }

    /// Finish the drag: the first child grows by the distance the indicator
    /// travelled and the second shrinks by the same amount. Returns that
    /// distance, or None when no drag is active.
    pub fn end_drag(&mut self) -> Option<f64> {
        let id = self.active_drag.take()?;
        let delta = self.divider_mut(id).and_then(Divider::finish);
        self.listener.restore_input();

        let delta = delta?;
        let split = self.pane(id)?.split()?;
        let dimension = split.dimension();
        let [first, second] = split.children();

        // An unclamped indicator may overshoot; the committed move never
        // takes either child, or a pane inside it, below zero.
        let shrink_limit = sizing::shrink_capacity(&self.panes, first, dimension);
        let grow_limit = sizing::shrink_capacity(&self.panes, second, dimension);
        let committed = delta.clamp(-shrink_limit, grow_limit);
        if committed != delta {
            tracing::debug!("Drag on {} clamped from {:.1} to {:.1}", id, delta, committed);
        }
        let delta = committed;

        if delta != 0.0 {
            sizing::plan_forced(&self.panes, first, delta, dimension).apply(&mut self.panes);
            sizing::plan_forced(&self.panes, second, -delta, dimension).apply(&mut self.panes);
        }
        tracing::debug!("Drag ended on {}, moved {:.1}px", id, delta);

        if let Some(pane) = self.panes.get(&id) {
            self.listener.on_drag(pane, delta);
        }
        Some(delta)
    }

    /// Abandon the drag without resizing anything, e.g. when the pointer was
    /// released outside the tracked region. Returns true if a drag was active.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(id) = self.active_drag.take() else {
            return false;
        };
        if let Some(divider) = self.divider_mut(id) {
            divider.finish();
        }
        self.listener.restore_input();
        tracing::debug!("Drag cancelled on {}", id);
        true
    }

    fn divider_mut(&mut self, id: PaneId) -> Option<&mut Divider> {
        self.panes
            .get_mut(&id)
            .and_then(|p| p.split.as_mut())
            .map(|s| &mut s.divider)
    }

    /// Range the divider's leading edge may take without pushing either
    /// child, or a pane inside it, below zero.
    fn drag_bounds(&self, id: PaneId) -> Option<(f64, f64)> {
        let split = self.pane(id)?.split()?;
        let dimension = split.dimension();
        let [first, second] = split.children();
        let position = self.divider_rect(id)?.start(dimension);
        Some((
            position - sizing::shrink_capacity(&self.panes, first, dimension),
            position + sizing::shrink_capacity(&self.panes, second, dimension),
        ))
    }
}

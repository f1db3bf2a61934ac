// ABOUTME: Listener interface the layout calls after each committed change.
// ABOUTME: All methods default to no-ops so controllers implement only what they need.

use crate::pane::Pane;

/// Callbacks fired synchronously once a mutation has left the tree consistent.
pub trait LayoutListener {
    /// A pane was created by `add` or `load`
    fn on_add(&mut self, _pane: &Pane) {}

    /// A pane was detached by `remove`; it is no longer in the tree
    fn on_remove(&mut self, _pane: &Pane) {}

    /// A divider drag finished and moved the split of `pane` by `delta` pixels
    fn on_drag(&mut self, _pane: &Pane, _delta: f64) {}

    /// A divider drag started; block incidental text or drag selection
    fn suppress_input(&mut self) {}

    /// The divider drag is over, however it ended
    fn restore_input(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl LayoutListener for NoopListener {}

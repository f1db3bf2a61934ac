// ABOUTME: Recursive pixel-delta distribution through the pane arena.
// ABOUTME: Plans are computed from an immutable arena and applied in one step.

use std::collections::BTreeMap;

use crate::geometry::Dimension;
use crate::pane::{Pane, PaneId};

pub type Arena = BTreeMap<PaneId, Pane>;

/// New extents along one dimension for every pane a delta reaches.
#[derive(Debug, Clone, PartialEq)]
pub struct SizePlan {
    dimension: Dimension,
    extents: Vec<(PaneId, f64)>,
    clamped: Vec<PaneId>,
}

impl SizePlan {
    fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            extents: Vec::new(),
            clamped: Vec::new(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Planned extent for a pane, if the delta changes it
    pub fn extent(&self, id: PaneId) -> Option<f64> {
        self.extents
            .iter()
            .find(|(pane, _)| *pane == id)
            .map(|(_, extent)| *extent)
    }

    /// Panes whose extent would have gone negative
    pub fn clamped(&self) -> &[PaneId] {
        &self.clamped
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    pub(crate) fn apply(self, arena: &mut Arena) {
        for (id, extent) in self.extents {
            if let Some(pane) = arena.get_mut(&id) {
                pane.size.set(self.dimension, extent);
            }
        }
    }
}

/// Plan growing `id` by `delta` along `dimension`.
///
/// Deltas along a split are shared by the children's current extents, or go
/// entirely to the flexible child when its sibling is fixed. Deltas across a
/// split reach both children unchanged. A fixed pane keeps its own extent
/// along its parent's split dimension.
pub fn plan(arena: &Arena, id: PaneId, delta: f64, dimension: Dimension) -> SizePlan {
    let mut plan = SizePlan::new(dimension);
    visit(arena, id, delta, dimension, false, &mut plan);
    plan
}

/// Like [`plan`], but `id` itself always takes the delta even when fixed.
/// Descendants still follow the usual rules.
pub fn plan_forced(arena: &Arena, id: PaneId, delta: f64, dimension: Dimension) -> SizePlan {
    let mut plan = SizePlan::new(dimension);
    visit(arena, id, delta, dimension, true, &mut plan);
    plan
}

fn visit(arena: &Arena, id: PaneId, delta: f64, dimension: Dimension, force: bool, plan: &mut SizePlan) {
    let Some(pane) = arena.get(&id) else {
        return;
    };

    if let Some(split) = pane.split() {
        let [first, second] = split.children();
        if let (Some(a), Some(b)) = (arena.get(&first), arena.get(&second)) {
            if split.dimension() == dimension {
                match (a.is_fixed(), b.is_fixed()) {
                    (true, false) => visit(arena, second, delta, dimension, false, plan),
                    (false, true) => visit(arena, first, delta, dimension, false, plan),
                    _ => {
                        let (ea, eb) = (a.size.get(dimension), b.size.get(dimension));
                        let total = ea + eb;
                        let ratio = if total > 0.0 { ea / total } else { 0.5 };
                        let share = delta * ratio;
                        visit(arena, first, share, dimension, false, plan);
                        visit(arena, second, delta - share, dimension, false, plan);
                    }
                }
            } else {
                visit(arena, first, delta, dimension, false, plan);
                visit(arena, second, delta, dimension, false, plan);
            }
        }
    }

    if force || !pinned(arena, pane, dimension) {
        let wanted = pane.size.get(dimension) + delta;
        if wanted < 0.0 {
            tracing::debug!(
                "Clamping pane {} {:?} from {:.2} to 0",
                pane.id,
                dimension,
                wanted
            );
            plan.clamped.push(pane.id);
        }
        plan.extents.push((pane.id, wanted.max(0.0)));
    }
}

/// How far a forced shrink of `id` along `dimension` can go before a pane
/// under it would have to drop below zero. Fixed panes and the dividers
/// of splits along `dimension` are the part that cannot give way.
pub fn shrink_capacity(arena: &Arena, id: PaneId, dimension: Dimension) -> f64 {
    let Some(pane) = arena.get(&id) else {
        return 0.0;
    };
    let own = pane.size.get(dimension).max(0.0);
    let Some(split) = pane.split() else {
        return own;
    };
    let [first, second] = split.children();
    let (Some(a), Some(b)) = (arena.get(&first), arena.get(&second)) else {
        return own;
    };

    let inner = if split.dimension() == dimension {
        match (a.is_fixed(), b.is_fixed()) {
            (true, false) => shrink_capacity(arena, second, dimension),
            (false, true) => shrink_capacity(arena, first, dimension),
            (true, true) => 0.0,
            (false, false) => {
                let (ea, eb) = (a.size.get(dimension), b.size.get(dimension));
                let total = ea + eb;
                if total <= 0.0 {
                    0.0
                } else {
                    // A proportional shrink stops once either child runs out.
                    let limit = |child: PaneId, extent: f64| {
                        if extent > 0.0 {
                            shrink_capacity(arena, child, dimension) * total / extent
                        } else {
                            f64::INFINITY
                        }
                    };
                    limit(first, ea).min(limit(second, eb))
                }
            }
        }
    } else {
        shrink_capacity(arena, first, dimension).min(shrink_capacity(arena, second, dimension))
    };
    inner.min(own)
}

/// Fixed panes only hold still along the dimension their parent splits.
fn pinned(arena: &Arena, pane: &Pane, dimension: Dimension) -> bool {
    if !pane.is_fixed() {
        return false;
    }
    pane.parent
        .and_then(|parent| arena.get(&parent))
        .and_then(|parent| parent.split())
        .map(|split| split.dimension() == dimension)
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::pane::{PaneConfig, Split};

    fn leaf(arena: &mut Arena, id: u64, parent: Option<u64>, size: Size, fixed: bool) {
        let mut config = PaneConfig::default();
        config.fixed = fixed;
        let mut pane = Pane::new(PaneId(id), config, size);
        pane.parent = parent.map(PaneId);
        arena.insert(PaneId(id), pane);
    }

    /// Width split of 800x600: children 300 and 500, no divider.
    fn two_columns(first_fixed: bool) -> Arena {
        let mut arena = Arena::new();
        leaf(&mut arena, 0, None, Size::new(800.0, 600.0), false);
        leaf(&mut arena, 1, Some(0), Size::new(300.0, 600.0), first_fixed);
        leaf(&mut arena, 2, Some(0), Size::new(500.0, 600.0), false);
        arena.get_mut(&PaneId(0)).unwrap().split =
            Some(Split::new(Dimension::Width, [PaneId(1), PaneId(2)], true));
        arena
    }

    #[test]
    fn proportional_split_shares_by_current_size() {
        let arena = two_columns(false);
        let plan = plan(&arena, PaneId(0), 200.0, Dimension::Width);

        assert_eq!(plan.extent(PaneId(0)), Some(1000.0));
        assert_eq!(plan.extent(PaneId(1)), Some(375.0));
        assert_eq!(plan.extent(PaneId(2)), Some(625.0));
    }

    #[test]
    fn fixed_child_hands_delta_to_sibling() {
        let arena = two_columns(true);
        let plan = plan(&arena, PaneId(0), 200.0, Dimension::Width);

        assert_eq!(plan.extent(PaneId(1)), None);
        assert_eq!(plan.extent(PaneId(2)), Some(700.0));
    }

    #[test]
    fn cross_axis_delta_reaches_both_children() {
        let arena = two_columns(true);
        let plan = plan(&arena, PaneId(0), -100.0, Dimension::Height);

        assert_eq!(plan.extent(PaneId(0)), Some(500.0));
        assert_eq!(plan.extent(PaneId(1)), Some(500.0));
        assert_eq!(plan.extent(PaneId(2)), Some(500.0));
    }

    #[test]
    fn negative_extents_clamp_to_zero() {
        let arena = two_columns(false);
        let plan = plan(&arena, PaneId(1), -400.0, Dimension::Width);

        assert_eq!(plan.extent(PaneId(1)), Some(0.0));
        assert_eq!(plan.clamped(), &[PaneId(1)]);
    }

    #[test]
    fn forced_plan_moves_fixed_pane() {
        let arena = two_columns(true);
        assert!(plan(&arena, PaneId(1), 50.0, Dimension::Width).is_empty());

        let forced = plan_forced(&arena, PaneId(1), 50.0, Dimension::Width);
        assert_eq!(forced.extent(PaneId(1)), Some(350.0));
    }

    #[test]
    fn zero_sized_children_split_evenly() {
        let mut arena = two_columns(false);
        arena.get_mut(&PaneId(1)).unwrap().size.width = 0.0;
        arena.get_mut(&PaneId(2)).unwrap().size.width = 0.0;

        let plan = plan(&arena, PaneId(0), 100.0, Dimension::Width);
        assert_eq!(plan.extent(PaneId(1)), Some(50.0));
        assert_eq!(plan.extent(PaneId(2)), Some(50.0));
    }

    #[test]
    fn shrink_capacity_stops_at_fixed_panes() {
        let arena = two_columns(true);
        assert_eq!(shrink_capacity(&arena, PaneId(0), Dimension::Width), 500.0);
        assert_eq!(shrink_capacity(&arena, PaneId(0), Dimension::Height), 600.0);

        let arena = two_columns(false);
        assert_eq!(shrink_capacity(&arena, PaneId(0), Dimension::Width), 800.0);
    }

    #[test]
    fn shrink_capacity_follows_proportional_shares() {
        // Column 2 stacks a 400px pane over a fixed 200px one.
        let mut arena = two_columns(false);
        leaf(&mut arena, 3, Some(2), Size::new(500.0, 400.0), false);
        leaf(&mut arena, 4, Some(2), Size::new(500.0, 200.0), true);
        arena.get_mut(&PaneId(2)).unwrap().split =
            Some(Split::new(Dimension::Height, [PaneId(3), PaneId(4)], true));

        assert_eq!(shrink_capacity(&arena, PaneId(0), Dimension::Width), 800.0);
        assert_eq!(shrink_capacity(&arena, PaneId(0), Dimension::Height), 400.0);
    }
}

// ABOUTME: Structural changes to the layout tree: splitting panes and closing them.
// ABOUTME: All checks run before the first change so failures leave the tree untouched.

use crate::error::LayoutError;
use crate::geometry::{Dimension, Position, Stacking};
use crate::pane::{Pane, PaneConfig, PaneId, Split};
use crate::sizing;
use crate::tree::LayoutTree;

impl LayoutTree {
    /// Split `target` and place a new pane built from `config` at `position`.
    ///
    /// The new pane gets `size` pixels along the split; the target keeps the
    /// rest minus the divider. A new internal pane takes over the target's
    /// slot in the tree (becoming the root when the target was the root).
    pub fn add(
        &mut self,
        config: PaneConfig,
        target: PaneId,
        position: Position,
        size: f64,
        silent: bool,
    ) -> Result<PaneId, LayoutError> {
        let pane = self.get(target)?;
        let is_root = target == self.root;
        if !pane.is_leaf() && !is_root {
            return Err(LayoutError::structural("split", target, "only leaves and the root can be split"));
        }
        if pane.config.noadd {
            return Err(LayoutError::structural("split", target, "pane does not accept new panes"));
        }
        if !size.is_finite() {
            return Err(LayoutError::structural("split", target, "requested size is not a finite number"));
        }

        let dimension = position.dimension();
        let thickness = self.options.divider_thickness;
        let outer = pane.size;
        // Fixed panes inside the target keep their extent, so only the rest
        // can make room for the new pane and its divider.
        let capacity = sizing::shrink_capacity(&self.panes, target, dimension);
        if capacity < thickness {
            return Err(LayoutError::structural("split", target, "no room left for a divider"));
        }
        let available = capacity - thickness;
        let claimed = size.clamp(0.0, available);
        if claimed != size {
            tracing::warn!(
                "Requested {:.1}px for a new pane in {}, only {:.1}px available",
                size,
                target,
                available
            );
        }

        let grandparent = pane.parent;
        let stacking = pane.stacking;
        let slot_fixed = pane.config.fixed;

        // Shrink the target (and its children, when it is the split root)
        // before it moves under the new container.
        let shrink = sizing::plan_forced(&self.panes, target, -(claimed + thickness), dimension);

        let new_id = self.alloc_id();
        let container_id = self.alloc_id();

        let mut new_config = config;
        new_config.size = Some(claimed);
        new_config.position = Some(position);
        let mut new_pane = Pane::new(new_id, new_config, outer.with(dimension, claimed));
        new_pane.parent = Some(container_id);
        new_pane.stacking = Stacking::for_split(dimension);

        let children = if position.is_leading() {
            [new_id, target]
        } else {
            [target, new_id]
        };
        let mut container_config = PaneConfig::of_type("container");
        container_config.fixed = slot_fixed;
        container_config.permanent = is_root;
        let mut container = Pane::new(container_id, container_config, outer);
        container.parent = grandparent;
        container.stacking = stacking;
        container.split = Some(Split::new(dimension, children, true));

        if let Some(pane) = self.panes.get_mut(&target) {
            pane.parent = Some(container_id);
            pane.config.fixed = false;
            pane.stacking = Stacking::for_split(dimension);
        }
        self.replace_child(grandparent, target, container_id);
        shrink.apply(&mut self.panes);
        self.panes.insert(container_id, container);
        self.panes.insert(new_id, new_pane);

        tracing::info!(
            "Added pane {} {:?} of {} ({:.1}px), container {}",
            new_id,
            position,
            target,
            claimed,
            container_id
        );

        if !silent {
            if let Some(pane) = self.panes.get(&new_id) {
                self.listener.on_add(pane);
            }
        }

        Ok(new_id)
    }

    /// Close `id` and everything below it. Its sibling takes over the parent's
    /// slot and grows to fill it.
    pub fn remove(&mut self, id: PaneId) -> Result<(), LayoutError> {
        let pane = self.get(id)?;
        if id == self.root {
            return Err(LayoutError::structural("remove", id, "the root pane cannot be removed"));
        }
        let Some(parent_id) = pane.parent else {
            return Err(LayoutError::structural("remove", id, "pane has no parent"));
        };
        if pane.config.permanent {
            return Err(LayoutError::structural("remove", id, "pane is permanent"));
        }
        let holds_permanent = self
            .subtree(id)
            .into_iter()
            .any(|child| self.panes.get(&child).is_some_and(|p| p.config.permanent));
        if holds_permanent {
            return Err(LayoutError::structural("remove", id, "a permanent pane lives inside it"));
        }
        let parent = self.get(parent_id)?;
        let Some(split) = parent.split() else {
            return Err(LayoutError::structural("remove", id, "parent is not split"));
        };
        let Some(slot) = split.slot_of(id) else {
            return Err(LayoutError::structural("remove", id, "parent does not list this pane"));
        };
        let sibling_id = split.children()[1 - slot];
        let sibling_size = self.get(sibling_id)?.size;

        let parent_size = parent.size;
        let grandparent = parent.parent;
        let slot_fixed = parent.config.fixed;
        let stacking = parent.stacking;

        let mut doomed = self.subtree(id);
        doomed.push(parent_id);
        if let Some(active) = self.active_drag {
            if doomed.contains(&active) {
                tracing::warn!("Cancelling drag on {} because its pane is being removed", active);
                self.cancel_drag();
            }
        }

        let mut removed = None;
        for doomed_id in &doomed {
            let pane = self.panes.remove(doomed_id);
            if *doomed_id == id {
                removed = pane;
            }
        }

        if let Some(sibling) = self.panes.get_mut(&sibling_id) {
            sibling.parent = grandparent;
            sibling.config.fixed = slot_fixed;
            sibling.stacking = stacking;
            if grandparent.is_none() {
                sibling.config.permanent = true;
            }
        }
        self.replace_child(grandparent, parent_id, sibling_id);

        for dimension in [Dimension::Height, Dimension::Width] {
            let delta = parent_size.get(dimension) - sibling_size.get(dimension);
            sizing::plan_forced(&self.panes, sibling_id, delta, dimension).apply(&mut self.panes);
        }

        tracing::info!(
            "Removed pane {} ({} panes gone), {} took over slot of {}",
            id,
            doomed.len(),
            sibling_id,
            parent_id
        );

        if let Some(pane) = removed {
            self.listener.on_remove(&pane);
        }

        Ok(())
    }

    /// Point `parent`'s child slot holding `old` at `new`, or make `new` the
    /// root when there is no parent.
    fn replace_child(&mut self, parent: Option<PaneId>, old: PaneId, new: PaneId) {
        match parent {
            Some(parent) => {
                let split = self.panes.get_mut(&parent).and_then(|p| p.split.as_mut());
                if let Some(split) = split {
                    if let Some(slot) = split.slot_of(old) {
                        split.children[slot] = new;
                    }
                }
            }
            None => self.root = new,
        }
    }
}

#[cfg(test)]
mod tests {
    use tiler_core::LayoutOptions;

    use super::*;
    use crate::geometry::Size;
    use crate::hooks::recording::{Event, Recorder};
    use crate::tree::tests::{assert_close, assert_consistent};

    fn tree() -> LayoutTree {
        LayoutTree::new(Size::new(800.0, 600.0), LayoutOptions::default())
    }

    #[test]
    fn add_wraps_target_in_container() {
        let mut tree = tree();
        let root = tree.root();
        let new = tree
            .add(PaneConfig::of_type("editor"), root, Position::Left, 300.0, true)
            .unwrap();

        let container = tree.root();
        assert_ne!(container, root);
        let split = tree.pane(container).unwrap().split().unwrap();
        assert_eq!(split.dimension(), Dimension::Width);
        assert_eq!(split.children(), [new, root]);

        let container_pane = tree.pane(container).unwrap();
        assert_eq!(container_pane.kind(), "container");
        assert!(container_pane.config().permanent);
        assert_eq!(container_pane.parent(), None);

        let new_pane = tree.pane(new).unwrap();
        assert_eq!(new_pane.kind(), "editor");
        assert_eq!(new_pane.size(), Size::new(300.0, 600.0));
        assert_eq!(new_pane.config().position, Some(Position::Left));
        assert_eq!(new_pane.config().size, Some(300.0));
        assert!(new_pane.stacking().is_floating());

        assert_eq!(tree.pane(root).unwrap().size(), Size::new(495.0, 600.0));
        assert_eq!(tree.pane(root).unwrap().parent(), Some(container));
        assert_consistent(&tree);
    }

    #[test]
    fn add_bottom_appends_after_target() {
        let mut tree = tree();
        let root = tree.root();
        let new = tree
            .add(PaneConfig::default(), root, Position::Bottom, 100.0, true)
            .unwrap();

        let split = tree.pane(tree.root()).unwrap().split().unwrap();
        assert_eq!(split.dimension(), Dimension::Height);
        assert_eq!(split.children(), [root, new]);
        assert_eq!(tree.pane(root).unwrap().size(), Size::new(800.0, 495.0));
        assert_consistent(&tree);
    }

    #[test]
    fn add_clamps_oversized_request() {
        let mut tree = tree();
        let root = tree.root();
        let new = tree
            .add(PaneConfig::default(), root, Position::Top, 5000.0, true)
            .unwrap();

        assert_close(tree.pane(new).unwrap().size().height, 595.0);
        assert_close(tree.pane(root).unwrap().size().height, 0.0);
        assert_consistent(&tree);
    }

    #[test]
    fn add_to_split_root_leaves_room_for_fixed_child() {
        let mut tree = tree();
        let content = tree.root();
        let fixed = tree
            .add(PaneConfig::default().fixed(), content, Position::Left, 300.0, true)
            .unwrap();
        let split = tree.root();

        let new = tree
            .add(PaneConfig::default(), split, Position::Left, 600.0, true)
            .unwrap();

        // The split can give up content's 495px: 490 for the pane, 5 for the bar.
        assert_close(tree.pane(new).unwrap().size().width, 490.0);
        assert_close(tree.pane(fixed).unwrap().size().width, 300.0);
        assert_close(tree.pane(content).unwrap().size().width, 0.0);
        assert_close(tree.pane(split).unwrap().size().width, 305.0);
        assert_consistent(&tree);
    }

    #[test]
    fn add_without_room_for_divider_is_refused() {
        let mut tree = LayoutTree::new(Size::new(800.0, 3.0), LayoutOptions::default());
        let root = tree.root();
        let err = tree
            .add(PaneConfig::default(), root, Position::Top, 1.0, true)
            .unwrap_err();

        assert!(matches!(err, LayoutError::Structural { reason: "no room left for a divider", .. }));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn add_to_missing_pane_fails_without_change() {
        let mut tree = tree();
        let err = tree
            .add(PaneConfig::default(), PaneId(99), Position::Left, 100.0, false)
            .unwrap_err();

        assert!(matches!(err, LayoutError::NotFound(PaneId(99))));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn add_to_internal_pane_is_structural_error() {
        let mut tree = tree();
        let root = tree.root();
        let left = tree
            .add(PaneConfig::default(), root, Position::Left, 300.0, true)
            .unwrap();
        tree.add(PaneConfig::default(), left, Position::Top, 100.0, true)
            .unwrap();
        let inner = tree.pane(left).unwrap().parent().unwrap();

        let before = tree.save().unwrap();
        let err = tree
            .add(PaneConfig::default(), inner, Position::Left, 50.0, true)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Structural { .. }));
        assert_eq!(tree.save().unwrap(), before);
    }

    #[test]
    fn add_refuses_noadd_target() {
        let mut tree = tree();
        let root = tree.root();
        let locked = tree
            .add(PaneConfig::default().noadd(), root, Position::Left, 300.0, true)
            .unwrap();

        let err = tree
            .add(PaneConfig::default(), locked, Position::Top, 100.0, true)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Structural { .. }));
    }

    #[test]
    fn add_to_split_root_resizes_its_children() {
        let mut tree = LayoutTree::new(Size::new(800.0, 600.0), LayoutOptions::borderless());
        let root = tree.root();
        let left = tree
            .add(PaneConfig::default(), root, Position::Left, 200.0, true)
            .unwrap();
        let old_root = tree.root();

        let footer = tree
            .add(PaneConfig::default(), old_root, Position::Bottom, 100.0, true)
            .unwrap();

        assert_eq!(tree.pane(tree.root()).unwrap().children(), Some([old_root, footer]));
        assert_close(tree.pane(old_root).unwrap().size().height, 500.0);
        assert_close(tree.pane(left).unwrap().size().height, 500.0);
        assert_close(tree.pane(root).unwrap().size().height, 500.0);
        assert_consistent(&tree);
    }

    #[test]
    fn add_then_remove_restores_layout() {
        let mut tree = tree();
        let root = tree.root();
        let side = tree
            .add(PaneConfig::default(), root, Position::Right, 250.0, true)
            .unwrap();
        tree.add(PaneConfig::default().fixed(), side, Position::Top, 120.0, true)
            .unwrap();
        tree.resize(Size::new(1000.0, 700.0));
        let before = tree.save().unwrap();
        let leaves = tree.leaves();

        let new = tree
            .add(PaneConfig::default(), root, Position::Bottom, 150.0, true)
            .unwrap();
        tree.remove(new).unwrap();

        assert_eq!(tree.leaves(), leaves);
        assert_eq!(tree.save().unwrap(), before);
        assert_consistent(&tree);
    }

    #[test]
    fn remove_root_is_structural_error() {
        let mut tree = tree();
        let root = tree.root();
        let err = tree.remove(root).unwrap_err();
        assert!(matches!(err, LayoutError::Structural { action: "remove", .. }));
    }

    #[test]
    fn remove_permanent_pane_is_refused() {
        let mut tree = tree();
        let root = tree.root();
        tree.add(PaneConfig::default(), root, Position::Left, 300.0, true)
            .unwrap();

        let err = tree.remove(root).unwrap_err();
        assert!(matches!(err, LayoutError::Structural { .. }));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn remove_missing_pane_is_not_found() {
        let mut tree = tree();
        assert!(matches!(tree.remove(PaneId(7)), Err(LayoutError::NotFound(PaneId(7)))));
    }

    #[test]
    fn remove_deep_leaf_keeps_grandparent_binary() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree
            .add(PaneConfig::default(), root, Position::Left, 300.0, true)
            .unwrap();
        let b = tree
            .add(PaneConfig::default(), a, Position::Bottom, 200.0, true)
            .unwrap();
        let c = tree
            .add(PaneConfig::default(), b, Position::Right, 100.0, true)
            .unwrap();
        let b_parent = tree.pane(b).unwrap().parent().unwrap();
        let grandparent = tree.pane(b_parent).unwrap().parent().unwrap();
        let slot = tree.pane(grandparent).unwrap().split().unwrap().slot_of(b_parent).unwrap();

        tree.remove(c).unwrap();

        let split = tree.pane(grandparent).unwrap().split().unwrap();
        assert_eq!(split.children().len(), 2);
        assert_eq!(split.children()[slot], b);
        assert_eq!(tree.pane(b).unwrap().parent(), Some(grandparent));
        assert!(tree.pane(b_parent).is_none());
        assert_eq!(tree.pane(b).unwrap().size(), Size::new(300.0, 200.0));
        assert_consistent(&tree);
    }

    #[test]
    fn remove_under_root_promotes_sibling_to_root() {
        let mut tree = tree();
        let root = tree.root();
        let side = tree
            .add(PaneConfig::default(), root, Position::Left, 300.0, true)
            .unwrap();
        let container = tree.root();

        tree.remove(side).unwrap();

        assert_eq!(tree.root(), root);
        assert!(tree.pane(container).is_none());
        let pane = tree.pane(root).unwrap();
        assert_eq!(pane.parent(), None);
        assert_eq!(pane.size(), Size::new(800.0, 600.0));
        assert_eq!(tree.len(), 1);
        assert_consistent(&tree);
    }

    #[test]
    fn remove_refuses_subtree_with_permanent_pane() {
        let mut tree = tree();
        let root = tree.root();
        let side = tree
            .add(PaneConfig::default(), root, Position::Left, 300.0, true)
            .unwrap();
        tree.add(PaneConfig::default(), root, Position::Top, 100.0, true)
            .unwrap();
        let content_split = tree.pane(root).unwrap().parent().unwrap();
        let before = tree.save().unwrap();

        let err = tree.remove(content_split).unwrap_err();
        assert!(matches!(err, LayoutError::Structural { .. }));
        assert_eq!(tree.save().unwrap(), before);

        tree.remove(side).unwrap();
        assert_eq!(tree.root(), content_split);
        assert!(tree.pane(content_split).unwrap().config().permanent);
        assert_consistent(&tree);
    }

    #[test]
    fn freed_space_goes_to_fixed_siblings_children() {
        let mut tree = LayoutTree::new(Size::new(1000.0, 600.0), LayoutOptions::borderless());
        let root = tree.root();
        let x = tree
            .add(PaneConfig::default(), root, Position::Right, 600.0, true)
            .unwrap();
        let f = tree
            .add(PaneConfig::default().fixed(), x, Position::Left, 200.0, true)
            .unwrap();
        let g = tree
            .add(PaneConfig::default(), f, Position::Right, 50.0, true)
            .unwrap();
        let fixed_split = tree.pane(f).unwrap().parent().unwrap();
        assert!(tree.pane(fixed_split).unwrap().is_fixed());
        assert_close(tree.pane(f).unwrap().size().width, 150.0);

        tree.remove(x).unwrap();

        // 400px freed, shared 150:50 by the fixed split's children.
        assert_close(tree.pane(f).unwrap().size().width, 450.0);
        assert_close(tree.pane(g).unwrap().size().width, 150.0);
        let promoted = tree.pane(fixed_split).unwrap();
        assert_close(promoted.size().width, 600.0);
        assert!(!promoted.is_fixed());
        assert_consistent(&tree);
    }

    #[test]
    fn promoted_fixed_sibling_takes_parent_slot() {
        let mut tree = LayoutTree::new(Size::new(800.0, 600.0), LayoutOptions::borderless());
        let root = tree.root();
        let panel = tree
            .add(PaneConfig::default(), root, Position::Left, 400.0, true)
            .unwrap();
        let upper = tree
            .add(PaneConfig::default(), panel, Position::Top, 200.0, true)
            .unwrap();
        let pinned = tree
            .add(PaneConfig::default().fixed(), upper, Position::Left, 100.0, true)
            .unwrap();
        let pinned_parent = tree.pane(pinned).unwrap().parent().unwrap();
        let upper_split_before = tree.pane(pinned_parent).unwrap().size();

        tree.remove(upper).unwrap();

        // The fixed pane now fills the slot its parent held and is no longer
        // pinned there.
        let pinned_pane = tree.pane(pinned).unwrap();
        assert_eq!(pinned_pane.size(), upper_split_before);
        assert!(!pinned_pane.is_fixed());
        assert_consistent(&tree);
    }

    #[test]
    fn freed_space_flows_into_sibling_children_proportionally() {
        let mut tree = LayoutTree::new(Size::new(1000.0, 600.0), LayoutOptions::borderless());
        let root = tree.root();
        let sidebar = tree
            .add(PaneConfig::default(), root, Position::Left, 200.0, true)
            .unwrap();
        let extra = tree
            .add(PaneConfig::default(), root, Position::Right, 300.0, true)
            .unwrap();
        // root (500) | extra (300) share one split; sidebar (200) sits beside it.
        let middle = tree.pane(root).unwrap().parent().unwrap();
        let below = tree
            .add(PaneConfig::default(), sidebar, Position::Bottom, 300.0, true)
            .unwrap();

        tree.remove(below).unwrap();
        assert_eq!(tree.pane(sidebar).unwrap().size(), Size::new(200.0, 600.0));
        let outer = tree.pane(sidebar).unwrap().parent().unwrap();

        tree.remove(sidebar).unwrap();
        assert!(tree.pane(outer).is_none());
        assert_eq!(tree.root(), middle);
        // 200px freed, shared 500:300 between the survivors.
        assert_close(tree.pane(root).unwrap().size().width, 625.0);
        assert_close(tree.pane(extra).unwrap().size().width, 375.0);
        assert_eq!(tree.pane(middle).unwrap().size(), Size::new(1000.0, 600.0));
        assert_consistent(&tree);
    }

    #[test]
    fn listener_sees_add_and_remove() {
        let recorder = Recorder::default();
        let mut tree = tree().with_listener(Box::new(recorder.clone()));
        let root = tree.root();

        let silent = tree
            .add(PaneConfig::default(), root, Position::Left, 100.0, true)
            .unwrap();
        let loud = tree
            .add(PaneConfig::default(), root, Position::Top, 100.0, false)
            .unwrap();
        tree.remove(silent).unwrap();

        assert_eq!(recorder.take(), vec![Event::Added(loud), Event::Removed(silent)]);
    }
}

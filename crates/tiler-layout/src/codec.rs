// ABOUTME: JSON save/load of the whole layout tree.
// ABOUTME: Loading rescales saved pixel sizes to a new container and swaps the tree in atomically.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::{Dimension, Size, Stacking};
use crate::pane::{Pane, PaneConfig, PaneId, Split};
use crate::sizing::Arena;
use crate::tree::LayoutTree;

/// Saved form of one pane and, for internal panes, its two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneRecord {
    #[serde(alias = "options")]
    pub configuration: PaneConfig,

    /// `[width, height]` in pixels at save time
    pub dimensions: [f64; 2],

    /// Set on children of a width split
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub floating: bool,

    /// Axis whose saved pixel value is kept literally instead of rescaled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<Dimension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PaneRecord>>,
}

impl PaneRecord {
    fn extent(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.dimensions[0],
            Dimension::Height => self.dimensions[1],
        }
    }

    fn keeps_literal(&self, dimension: Dimension) -> bool {
        self.configuration.fixed || self.exact == Some(dimension)
    }
}

impl LayoutTree {
    /// Typed snapshot of the tree, root first.
    pub fn snapshot(&self) -> PaneRecord {
        self.record_for(self.root)
            .unwrap_or_else(|| PaneRecord {
                configuration: PaneConfig::default(),
                dimensions: [self.container.width, self.container.height],
                floating: false,
                exact: None,
                children: None,
            })
    }

    fn record_for(&self, id: PaneId) -> Option<PaneRecord> {
        let pane = self.panes.get(&id)?;
        let parent_dimension = pane
            .parent
            .and_then(|parent| self.panes.get(&parent))
            .and_then(|parent| parent.split())
            .map(|split| split.dimension());

        let children = match pane.split() {
            Some(split) => {
                let [first, second] = split.children();
                Some(vec![self.record_for(first)?, self.record_for(second)?])
            }
            None => None,
        };

        Some(PaneRecord {
            configuration: pane.config.clone(),
            dimensions: [pane.size.width, pane.size.height],
            floating: pane.stacking.is_floating(),
            exact: parent_dimension.filter(|_| pane.is_fixed()),
            children,
        })
    }

    /// Serialize the tree to JSON.
    pub fn save(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Replace the whole tree with the one in `json`, fitted to `container`.
    /// On error the current tree is left untouched.
    pub fn load(&mut self, json: &str, container: Size) -> Result<(), LayoutError> {
        let record: PaneRecord = serde_json::from_str(json)?;
        self.restore(record, container)
    }

    /// Replace the whole tree with `record`, fitted to `container`.
    pub fn restore(&mut self, record: PaneRecord, container: Size) -> Result<(), LayoutError> {
        if !container.is_finite() || container.width < 0.0 || container.height < 0.0 {
            return Err(LayoutError::Malformed(format!(
                "container size {}x{} is not usable",
                container.width, container.height
            )));
        }
        let [saved_width, saved_height] = record.dimensions;
        if !(saved_width > 0.0 && saved_height > 0.0) {
            return Err(LayoutError::Malformed(format!(
                "saved root is {}x{}",
                saved_width, saved_height
            )));
        }

        let mut builder = Builder {
            arena: Arena::new(),
            next_id: self.next_id,
            thickness: self.options.divider_thickness,
        };
        let root = builder.build(&record, container, None, Stacking::Inherit)?;

        tracing::info!(
            "Loaded layout of {} panes, scaled {:.3}x{:.3} from {}x{}",
            builder.arena.len(),
            container.width / saved_width,
            container.height / saved_height,
            saved_width,
            saved_height
        );

        if self.active_drag.is_some() {
            tracing::warn!("Cancelling drag because the layout is being replaced");
            self.cancel_drag();
        }
        self.install(builder.arena, root, builder.next_id, container);

        for id in self.subtree(self.root) {
            if let Some(pane) = self.panes.get(&id) {
                self.listener.on_add(pane);
            }
        }
        Ok(())
    }
}

/// Builds a detached arena from a record tree, allocating ids pre-order.
struct Builder {
    arena: Arena,
    next_id: u64,
    thickness: f64,
}

impl Builder {
    fn build(
        &mut self,
        record: &PaneRecord,
        size: Size,
        parent: Option<PaneId>,
        stacking: Stacking,
    ) -> Result<PaneId, LayoutError> {
        if record.dimensions.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(LayoutError::Malformed(format!(
                "dimensions {:?} must be finite and non-negative",
                record.dimensions
            )));
        }

        let id = PaneId(self.next_id);
        self.next_id += 1;

        let mut pane = Pane::new(id, record.configuration.clone(), size);
        pane.parent = parent;
        pane.stacking = stacking;
        if parent.is_none() {
            pane.config.permanent = true;
        }

        match record.children.as_deref() {
            None | Some([]) => {}
            Some([first, second]) => {
                if first.configuration.fixed && second.configuration.fixed {
                    return Err(LayoutError::Malformed(
                        "both children of a split are fixed".to_string(),
                    ));
                }
                let dimension = if first.floating {
                    Dimension::Width
                } else {
                    Dimension::Height
                };
                let [first_extent, second_extent] = self.share(first, second, size.get(dimension), dimension);

                let child_stacking = Stacking::for_split(dimension);
                let first_id = self.build(first, size.with(dimension, first_extent), Some(id), child_stacking)?;
                let second_id = self.build(second, size.with(dimension, second_extent), Some(id), child_stacking)?;

                let resizable = record.configuration.divider != Some(false);
                pane.split = Some(Split::new(dimension, [first_id, second_id], resizable));
            }
            Some(other) => {
                return Err(LayoutError::Malformed(format!(
                    "a split needs exactly two children, found {}",
                    other.len()
                )));
            }
        }

        self.arena.insert(id, pane);
        Ok(id)
    }

    /// Extents of two siblings inside `outer` pixels along `dimension`.
    fn share(&self, first: &PaneRecord, second: &PaneRecord, outer: f64, dimension: Dimension) -> [f64; 2] {
        let available = (outer - self.thickness).max(0.0);
        let literal = |record: &PaneRecord| record.extent(dimension).min(available);

        if first.keeps_literal(dimension) {
            let kept = literal(first);
            return [kept, available - kept];
        }
        if second.keeps_literal(dimension) {
            let kept = literal(second);
            return [available - kept, kept];
        }

        let (a, b) = (first.extent(dimension), second.extent(dimension));
        let total = a + b;
        let ratio = if total > 0.0 { a / total } else { 0.5 };
        let first_extent = available * ratio;
        [first_extent, available - first_extent]
    }
}

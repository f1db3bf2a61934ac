// ABOUTME: Errors raised by layout operations.
// ABOUTME: Every failing operation leaves the tree exactly as it found it.

use crate::pane::PaneId;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The operation is not allowed on this pane (root, permanent, leaf divider...)
    #[error("Cannot {action} pane {pane}: {reason}")]
    Structural {
        action: &'static str,
        pane: PaneId,
        reason: &'static str,
    },

    #[error("Pane {0} is not part of the layout")]
    NotFound(PaneId),

    #[error("Malformed layout record: {0}")]
    Malformed(String),
}

impl LayoutError {
    pub(crate) fn structural(action: &'static str, pane: PaneId, reason: &'static str) -> Self {
        LayoutError::Structural {
            action,
            pane,
            reason,
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Malformed(err.to_string())
    }
}

//! Outbound controller events.

use crate::change::RebuildScope;
use crate::id::ItemId;

/// Events queued by the controller for the host to drain.
///
/// The controller never calls back into the host directly; it queues events
/// and the host drains them after each interaction, which keeps re-entrancy
/// out of the picture (a host reacting to a selection change cannot land in
/// the middle of the mutation that produced it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceListEvent {
    /// The resolved selection changed.
    ///
    /// Emitted once per settle, never per row, and only when the resolved
    /// identifier sequence actually differs from the previous one.
    SelectionChanged {
        /// Selected items in display order.
        items: Vec<ItemId>,
    },
    /// The tree snapshot was rebuilt.
    TreeRebuilt {
        /// The scope that was actually executed (a subtree rebuild that had
        /// to escalate reports [`RebuildScope::Full`]).
        scope: RebuildScope,
    },
    /// An inline rename was rejected by the model's validator.
    ///
    /// The edit has already been reverted; the host surfaces the failure to
    /// the user (typically an alert) and resets the field to `restored`.
    EditRejected {
        /// Item whose rename was rejected.
        id: ItemId,
        /// The text the user entered.
        proposed: String,
        /// The value the edit reverted to.
        restored: String,
    },
}

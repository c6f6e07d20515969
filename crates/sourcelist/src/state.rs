//! Serializable view state, for hosts that restore the sidebar across runs.
//!
//! Only controller-owned state is captured: which items are collapsed and
//! which are selected. The tree itself is always re-derived from the model,
//! so stale identifiers in a stored blob are harmless; restore drops them.

use sourcelist_core::ItemId;
use std::collections::HashSet;

/// Snapshot of the view state of a
/// [`SourceList`](crate::source_list::SourceList).
///
/// Produced by [`save_state`](crate::source_list::SourceList::save_state)
/// and consumed by
/// [`restore_state`](crate::source_list::SourceList::restore_state). The
/// layout is plain enough to store in whatever format the host already
/// writes its preferences in.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceListState {
    /// Items whose children were hidden.
    pub collapsed: HashSet<ItemId>,
    /// The selection, in display order.
    pub selected: Vec<ItemId>,
}

//! Item-keyed selection state.
//!
//! The controller keeps the settled selection as identifiers, not row
//! numbers: rows shift with every rebuild and every expand or collapse,
//! identifiers do not. The host pushes row indices in, reads items out, and
//! hears about the change once per settle through
//! [`SourceListEvent::SelectionChanged`](sourcelist_core::SourceListEvent).

use sourcelist_core::ItemId;
use std::collections::HashSet;

use crate::tree::TreeSnapshot;

/// The settled selection, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<ItemId>,
}

impl Selection {
    /// Selected identifiers in display order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| item == id)
    }

    /// Swap in a new selection; reports whether anything changed.
    ///
    /// Callers hand in items already in display order.
    pub(crate) fn replace(&mut self, items: Vec<ItemId>) -> bool {
        if self.items == items {
            return false;
        }
        self.items = items;
        true
    }

    /// Re-settle against a rebuilt tree; reports whether anything changed.
    ///
    /// Items that vanished or stopped being selectable drop out, survivors
    /// are re-ordered to the tree's display order.
    pub(crate) fn reconcile(&mut self, tree: &TreeSnapshot) -> bool {
        let held: HashSet<&ItemId> = self.items.iter().collect();
        let survivors: Vec<ItemId> = tree
            .display_order()
            .into_iter()
            .filter(|id| held.contains(id))
            .filter(|id| tree.get(id).is_some_and(|node| node.is_selectable()))
            .cloned()
            .collect();
        self.replace(survivors)
    }
}

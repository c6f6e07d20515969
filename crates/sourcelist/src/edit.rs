//! Inline rename flow: validate first, write back or revert.
//!
//! The controller opens at most one edit at a time. On commit the proposal
//! is checked with the model before anything is written; a rejected name is
//! never stored, the caller gets the text to restore, and an
//! [`EditRejected`](sourcelist_core::SourceListEvent::EditRejected) event
//! carries enough context for the host to explain itself to the user.

use sourcelist_core::{ItemId, SourceModel};

/// How a finished edit resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The proposal was written through, or matched the original exactly.
    Committed,
    /// The proposal failed validation; show `restored` again.
    Reverted {
        /// The text the item had when the edit began.
        restored: String,
    },
}

/// The rename in flight: which item, and the text to fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActiveEdit {
    pub id: ItemId,
    pub original: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditVerdict {
    /// Nothing changed; nothing to validate or write.
    Unchanged,
    /// The model accepted the proposal.
    Accepted,
    /// The model vetoed the proposal.
    Rejected,
}

impl ActiveEdit {
    /// Judge a proposed name. An unchanged name skips validation entirely,
    /// so a model that would veto its own current value cannot wedge the
    /// edit flow.
    pub(crate) fn review<M: SourceModel>(&self, model: &M, proposed: &str) -> EditVerdict {
        if proposed == self.original {
            return EditVerdict::Unchanged;
        }
        if model.validate_name_change(&self.id, proposed) {
            EditVerdict::Accepted
        } else {
            EditVerdict::Rejected
        }
    }
}

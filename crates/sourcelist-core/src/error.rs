//! Controller error type.

use crate::id::ItemId;
use thiserror::Error;

/// Errors surfaced by the controller.
///
/// [`EmptyRoots`](Self::EmptyRoots),
/// [`DuplicateIdentifier`](Self::DuplicateIdentifier), and
/// [`MissingCapability`](Self::MissingCapability) are contract violations:
/// the model configuration is wrong and the operation that hit them cannot
/// be retried meaningfully. The drag and edit variants are ordinary flow
/// control (a refused gesture, or a call outside its window) and leave the
/// controller fully usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceListError {
    /// The model reported no root items.
    #[error("model returned no root items")]
    EmptyRoots,

    /// The same identifier appeared twice within one rebuild.
    #[error("duplicate item identifier: {id}")]
    DuplicateIdentifier {
        /// The identifier that appeared twice.
        id: ItemId,
    },

    /// An operation referenced an identifier absent from the tree.
    #[error("unknown item identifier: {id}")]
    UnknownItem {
        /// The identifier that could not be resolved.
        id: ItemId,
    },

    /// A row index was out of bounds for the current visible rows.
    #[error("row {row} out of bounds ({rows} visible rows)")]
    RowOutOfBounds {
        /// The requested row.
        row: usize,
        /// Number of visible rows at the time of the call.
        rows: usize,
    },

    /// The model enabled a behavior without the callback it depends on.
    #[error("missing {needed} capability: {reason}")]
    MissingCapability {
        /// The capability flag(s) that would fix it.
        needed: &'static str,
        /// What the controller was asked to do.
        reason: &'static str,
    },

    /// A drag could not start.
    #[error("drag refused: {reason}")]
    DragRejected {
        /// Why the gesture was refused.
        reason: &'static str,
    },

    /// A drop was refused.
    #[error("drop rejected: {reason}")]
    DropRejected {
        /// Why the drop was refused.
        reason: &'static str,
    },

    /// A drag session is already active.
    #[error("a drag session is already active")]
    DragInProgress,

    /// No drag session is active.
    #[error("no active drag session")]
    NoActiveDrag,

    /// The row's item does not accept inline renames.
    #[error("item is not editable: {id}")]
    NotEditable {
        /// The item that refused the edit.
        id: ItemId,
    },

    /// An inline edit is already active.
    #[error("an inline edit is already active")]
    EditInProgress,

    /// No inline edit is active.
    #[error("no active inline edit")]
    NoActiveEdit,
}

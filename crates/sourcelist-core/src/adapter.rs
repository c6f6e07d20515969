//! The adapter trait a host implements to expose its model.

use crate::capability::Capabilities;
use crate::id::ItemId;
use crate::payload::DragPayload;
use crate::sort::{SortDescriptor, SortValue};

// ---------------------------------------------------------------------------
// DropTarget
// ---------------------------------------------------------------------------

/// Prospective destination of a drop.
///
/// A drop lands either *onto* an item (making it the container, host-defined)
/// or *between* two siblings at an index. The index in [`Self::Between`]
/// refers to the target parent's child list **before** any dragged item is
/// removed from it, which is how outline widgets report drop slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Drop directly onto an item.
    On(ItemId),
    /// Drop between siblings at `index` within `parent`'s children, or at
    /// the root level when `parent` is `None`.
    Between {
        /// Parent whose child list receives the items; `None` is root level.
        parent: Option<ItemId>,
        /// Insertion slot in the pre-removal child list; may equal the child
        /// count to append.
        index: usize,
    },
}

impl DropTarget {
    /// The item the drop is anchored to, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&ItemId> {
        match self {
            DropTarget::On(id) => Some(id),
            DropTarget::Between {
                parent: Some(id), ..
            } => Some(id),
            DropTarget::Between { parent: None, .. } => None,
        }
    }

    /// Whether this is a between-siblings drop.
    #[must_use]
    pub fn is_between(&self) -> bool {
        matches!(self, DropTarget::Between { .. })
    }
}

// ---------------------------------------------------------------------------
// DragOperation
// ---------------------------------------------------------------------------

/// What an accepted drop will do, as answered by a drop validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOperation {
    /// The drop is refused.
    None,
    /// The items move to the target.
    Move,
    /// The items are copied to the target.
    Copy,
}

impl DragOperation {
    /// Whether the operation permits the drop.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, DragOperation::None)
    }
}

// ---------------------------------------------------------------------------
// SourceModel trait
// ---------------------------------------------------------------------------

/// The capability set a host implements to drive a source list.
///
/// Six methods are required; they are enough for a read-only list. Everything
/// else has a default body encoding the conservative answer (no icon, not
/// editable, no drag and drop), so a model opts into behavior by overriding
/// the callbacks it cares about, and by declaring the drop-related ones in
/// [`capabilities`](Self::capabilities), since the controller must distinguish
/// a genuine implementation from a default body before delegating to it.
///
/// Identifiers returned from [`roots`](Self::roots) and
/// [`children_of`](Self::children_of) must be unique across the whole tree at
/// any point in time; the controller treats a duplicate within one rebuild as
/// a fatal contract violation (this also catches accidental cycles in the
/// parent/child answers).
///
/// Mutating callbacks take `&mut self`; the controller owns the model and is
/// single-threaded, so no interior mutability is needed.
///
/// # Example
///
/// ```
/// use sourcelist_core::{ItemId, SourceModel};
///
/// struct Flat {
///     names: Vec<&'static str>,
/// }
///
/// impl SourceModel for Flat {
///     fn roots(&self) -> Vec<ItemId> {
///         vec![ItemId::new("library")]
///     }
///
///     fn is_root(&self, id: &ItemId) -> bool {
///         id.as_str() == "library"
///     }
///
///     fn children_of(&self, id: &ItemId) -> Vec<ItemId> {
///         if self.is_root(id) {
///             self.names.iter().copied().map(ItemId::new).collect()
///         } else {
///             Vec::new()
///         }
///     }
///
///     fn display_name(&self, id: &ItemId) -> String {
///         id.as_str().to_owned()
///     }
///
///     fn set_display_name(&mut self, _id: &ItemId, _name: &str) {}
///
///     fn is_selectable(&self, id: &ItemId) -> bool {
///         !self.is_root(id)
///     }
/// }
/// ```
pub trait SourceModel {
    // --- required ---

    /// Identifiers of the root items (group headers), in declared order.
    ///
    /// An empty answer is a configuration error; the controller refuses to
    /// build a tree from it.
    fn roots(&self) -> Vec<ItemId>;

    /// Whether `id` is a root item.
    ///
    /// Roots are rendered as group headers and are never selectable,
    /// editable, or draggable, regardless of the other callbacks.
    fn is_root(&self, id: &ItemId) -> bool;

    /// Ordered child identifiers of `id`; empty for leaves.
    ///
    /// The returned order is the fallback display order when no sort
    /// descriptors or ordering indexes apply.
    fn children_of(&self, id: &ItemId) -> Vec<ItemId>;

    /// Current display name of `id`.
    fn display_name(&self, id: &ItemId) -> String;

    /// Persist a new display name for `id`.
    ///
    /// Called after [`validate_name_change`](Self::validate_name_change)
    /// accepted the text; never called for a rejected edit.
    fn set_display_name(&mut self, id: &ItemId, name: &str);

    /// Whether `id` may appear in the selection.
    fn is_selectable(&self, id: &ItemId) -> bool;

    // --- display ---

    /// Icon key rendered before the name, if any.
    fn icon(&self, _id: &ItemId) -> Option<String> {
        None
    }

    /// Whether `id` may be collapsed by the user.
    fn is_collapsible(&self, _id: &ItemId) -> bool {
        true
    }

    // --- inline editing ---

    /// Whether `id` accepts inline renames.
    fn is_editable(&self, _id: &ItemId) -> bool {
        false
    }

    /// Whether `proposed` is an acceptable new name for `id`.
    ///
    /// Returning `false` reverts the edit and surfaces an
    /// [`EditRejected`](crate::event::SourceListEvent::EditRejected) event.
    fn validate_name_change(&self, _id: &ItemId, _proposed: &str) -> bool {
        true
    }

    // --- ordering ---

    /// Sort criteria applied to every sibling group, highest priority first.
    fn sort_descriptors(&self) -> Vec<SortDescriptor> {
        Vec::new()
    }

    /// Resolve a [`SortKey::Field`](crate::sort::SortKey::Field) value for `id`.
    ///
    /// `None` sorts after every `Some` value.
    fn sort_value(&self, _id: &ItemId, _field: &str) -> Option<SortValue> {
        None
    }

    /// The persisted ordering index of `id`, if it has one.
    ///
    /// Only consulted when [`Capabilities::ORDERING_INDEX`] is declared.
    fn ordering_index(&self, _id: &ItemId) -> Option<i64> {
        None
    }

    /// Persist a new ordering index for `id`.
    ///
    /// After a reordering drop the controller calls this once per sibling
    /// whose index actually changed; indexes form a dense zero-based run in
    /// final display order.
    fn set_ordering_index(&mut self, _id: &ItemId, _index: i64) {}

    // --- hierarchy ---

    /// Current parent of `id`, or `None` for roots (and unknown items).
    ///
    /// Used to scope rebuilds triggered by change notifications; a model
    /// that cannot answer falls back to full rebuilds.
    fn parent_of(&self, _id: &ItemId) -> Option<ItemId> {
        None
    }

    // --- drag and drop ---

    /// Whether drags may start inside the list at all.
    fn supports_internal_drag(&self) -> bool {
        false
    }

    /// Whether between-siblings drops (reordering) are enabled.
    ///
    /// Requires [`Capabilities::INDEX_DROP`] or
    /// [`Capabilities::ORDERING_INDEX`]; enabling it with neither is a
    /// configuration error surfaced at controller construction.
    fn allows_reordering(&self) -> bool {
        false
    }

    /// Whether the given items may be dragged.
    ///
    /// Root items are refused before this is consulted.
    fn allows_drag(&self, _ids: &[ItemId]) -> bool {
        true
    }

    /// Validate a prospective drop of `ids` at `target`.
    ///
    /// Only authoritative when [`Capabilities::VALIDATE_DROP`] is declared;
    /// the controller applies its own cycle and no-op rejections first in
    /// either case.
    fn validate_drop(&self, _ids: &[ItemId], _target: &DropTarget) -> DragOperation {
        DragOperation::Move
    }

    /// Commit a drop of `ids` onto `on`, mutating the model.
    ///
    /// The host owns the mutation (typically a parent-relationship update).
    /// Return `false` to refuse the drop at commit time. Requires
    /// [`Capabilities::ITEM_DROP`].
    fn accept_item_drop(&mut self, _ids: &[ItemId], _on: &ItemId) -> bool {
        false
    }

    /// Commit a between-siblings drop of `ids` at `index` under `parent`.
    ///
    /// `index` refers to the pre-removal child list. A model declaring
    /// [`Capabilities::INDEX_DROP`] takes over all ordering bookkeeping;
    /// without it the controller computes and persists dense indexes through
    /// [`set_ordering_index`](Self::set_ordering_index) itself.
    fn accept_index_drop(&mut self, _ids: &[ItemId], _parent: &ItemId, _index: usize) -> bool {
        false
    }

    /// Commit a drop of an external payload at `target`.
    ///
    /// The host performs any insertion itself; the controller only rebuilds
    /// around the target afterwards. Requires
    /// [`Capabilities::EXTERNAL_DROP`].
    fn accept_external_drop(&mut self, _payload: &DragPayload, _target: &DropTarget) -> bool {
        false
    }

    /// Payload kind patterns accepted from external drags, e.g. `"text/*"`.
    fn external_payload_kinds(&self) -> Vec<String> {
        Vec::new()
    }

    // --- probe ---

    /// The optional callbacks this model genuinely implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }
}

//! Drag-and-drop sessions: planning, validation, and the phase machine.
//!
//! A session runs `Idle → Dragging → Validating → Accepted | Rejected →
//! Idle`. The transient phases exist only inside a controller call; between
//! calls the machine rests at `Idle` or `Dragging`. This module owns the
//! pure parts: the session record captured at drag start, the structural
//! rules every drop must pass (cycle protection first of all), and the
//! arithmetic that turns "drop between these siblings" into a dense,
//! zero-based index assignment.
//!
//! Index arithmetic follows the convention hosts already speak: the drop
//! index counts positions in the sibling list *as currently shown*, before
//! the dragged items leave it. Dropping item `C` of `[A, B, C]` at index `0`
//! therefore yields `[C, A, B]`, and dropping it at index `2` changes
//! nothing.

use sourcelist_core::{
    Capabilities, DragOperation, DropTarget, ItemId, SourceListError, SourceModel,
};
use std::collections::HashSet;

use crate::tree::TreeSnapshot;

// ---------------------------------------------------------------------------
// Phase and session
// ---------------------------------------------------------------------------

/// Where the drag state machine currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// No drag in flight.
    #[default]
    Idle,
    /// A session is open; drops may be validated or performed.
    Dragging,
    /// Inside a validation or drop call.
    Validating,
    /// A drop was committed; reported before the machine returns to idle.
    Accepted,
    /// A drop or the whole session was refused; reported before idle.
    Rejected,
}

/// Where one dragged item started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOrigin {
    /// Parent at drag start; never `None`, since roots cannot be dragged.
    pub parent: Option<ItemId>,
    /// Position within that parent's children at drag start.
    pub index: usize,
}

/// One open drag: the items in flight, in the order they were shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    items: Vec<ItemId>,
    origins: Vec<DragOrigin>,
}

impl DragSession {
    /// Record the dragged items and where each one currently sits.
    pub(crate) fn capture(tree: &TreeSnapshot, items: Vec<ItemId>) -> Self {
        let origins = items
            .iter()
            .map(|id| DragOrigin {
                parent: tree.parent_of(id).cloned(),
                index: tree.position_in_parent(id).unwrap_or_default(),
            })
            .collect();
        Self { items, origins }
    }

    /// Dragged identifiers in display order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Origin record per dragged item, parallel to [`items`](Self::items).
    #[must_use]
    pub fn origins(&self) -> &[DragOrigin] {
        &self.origins
    }
}

// ---------------------------------------------------------------------------
// Reorder planning
// ---------------------------------------------------------------------------

/// One ordering-index assignment the host should persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexWrite {
    pub id: ItemId,
    pub index: i64,
}

/// Everything a between-siblings drop will do, computed before any of it
/// happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReorderPlan {
    /// Final child order per affected parent, the drop target first.
    pub orders: Vec<(ItemId, Vec<ItemId>)>,
    /// Dense zero-based assignments, skipping values already persisted.
    pub writes: Vec<IndexWrite>,
    /// Dragged items whose parent changes, in drag order.
    pub reparented: Vec<ItemId>,
    noop: bool,
}

impl ReorderPlan {
    /// Whether carrying out the plan would change nothing visible.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.noop
    }
}

/// Work out the outcome of dropping `dragged` between the children of
/// `parent` at `index`.
///
/// The index refers to the child list before the dragged items are removed
/// from it, and is clamped to that list's length. Each affected sibling
/// group (the target's, plus every group a dragged item leaves) is
/// renumbered densely from zero, but only positions whose cached index
/// differs are emitted as writes.
pub(crate) fn plan_reorder(
    tree: &TreeSnapshot,
    dragged: &[ItemId],
    parent: &ItemId,
    index: usize,
) -> Result<ReorderPlan, SourceListError> {
    let children = tree
        .children_of(parent)
        .ok_or_else(|| SourceListError::UnknownItem { id: parent.clone() })?;
    let dragged_set: HashSet<&ItemId> = dragged.iter().collect();

    let clamped = index.min(children.len());
    let occupied = children[..clamped]
        .iter()
        .filter(|child| dragged_set.contains(child))
        .count();
    let adjusted = clamped - occupied;

    let mut target_order: Vec<ItemId> = children
        .iter()
        .filter(|child| !dragged_set.contains(child))
        .cloned()
        .collect();
    target_order.splice(adjusted..adjusted, dragged.iter().cloned());

    let reparented: Vec<ItemId> = dragged
        .iter()
        .filter(|id| tree.parent_of(id) != Some(parent))
        .cloned()
        .collect();
    let noop = reparented.is_empty() && target_order == children;

    let mut orders = vec![(parent.clone(), target_order)];
    for id in &reparented {
        let Some(source) = tree.parent_of(id) else {
            continue;
        };
        if orders.iter().any(|(ordered, _)| ordered == source) {
            continue;
        }
        let residual: Vec<ItemId> = tree
            .children_of(source)
            .unwrap_or(&[])
            .iter()
            .filter(|child| !dragged_set.contains(child))
            .cloned()
            .collect();
        orders.push((source.clone(), residual));
    }

    let mut writes = Vec::new();
    for (_, order) in &orders {
        for (position, id) in order.iter().enumerate() {
            let position = position as i64;
            let cached = tree.get(id).and_then(|node| node.ordering_index());
            if cached != Some(position) {
                writes.push(IndexWrite {
                    id: id.clone(),
                    index: position,
                });
            }
        }
    }

    Ok(ReorderPlan {
        orders,
        writes,
        reparented,
        noop,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Decide whether a drop may land, and with which operation.
///
/// Structural rules run first and cannot be waived by the model: the target
/// must exist, must not be one of the dragged items or sit below one, and
/// the drop must change something. Past those, a model advertising
/// [`Capabilities::VALIDATE_DROP`] gets the final word; otherwise any
/// structurally sound drop onto an item is legal (whether the model can
/// commit it is the accept path's concern) and drops between siblings
/// require [`SourceModel::allows_reordering`].
pub(crate) fn validate<M: SourceModel>(
    model: &M,
    tree: &TreeSnapshot,
    session: &DragSession,
    target: &DropTarget,
) -> Result<DragOperation, &'static str> {
    check_structure(tree, session, target)?;

    if model.capabilities().contains(Capabilities::VALIDATE_DROP) {
        let operation = model.validate_drop(session.items(), target);
        return if operation.is_allowed() {
            Ok(operation)
        } else {
            Err("the model rejected the drop")
        };
    }
    match target {
        DropTarget::On(_) => Ok(DragOperation::Move),
        DropTarget::Between { .. } => {
            if model.allows_reordering() {
                Ok(DragOperation::Move)
            } else {
                Err("reordering is disabled")
            }
        }
    }
}

fn check_structure(
    tree: &TreeSnapshot,
    session: &DragSession,
    target: &DropTarget,
) -> Result<(), &'static str> {
    let anchor = match target {
        DropTarget::On(anchor) => anchor,
        DropTarget::Between {
            parent: Some(parent),
            ..
        } => parent,
        DropTarget::Between { parent: None, .. } => {
            return Err("root-level reordering is not supported");
        }
    };
    if !tree.contains(anchor) {
        return Err("drop target is not in the tree");
    }
    if session.items().contains(anchor) {
        return Err("cannot drop an item onto itself");
    }
    if session
        .items()
        .iter()
        .any(|id| tree.is_descendant_of(anchor, id))
    {
        return Err("cannot drop an item into its own descendant");
    }
    match target {
        DropTarget::On(on) => {
            if session
                .items()
                .iter()
                .all(|id| tree.parent_of(id) == Some(on))
            {
                return Err("items are already inside the target");
            }
        }
        DropTarget::Between {
            parent: Some(parent),
            index,
        } => {
            let plan = plan_reorder(tree, session.items(), parent, *index)
                .map_err(|_| "drop target is not in the tree")?;
            if plan.is_noop() {
                return Err("drop leaves the order unchanged");
            }
        }
        // Rejected above.
        DropTarget::Between { parent: None, .. } => {}
    }
    Ok(())
}

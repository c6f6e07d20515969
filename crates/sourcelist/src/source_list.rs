//! The controller: one value that owns the model, keeps the derived tree,
//! and answers in rows.
//!
//! [`SourceList`] is the crate's front door. It wraps a host-supplied
//! [`SourceModel`], derives a [`TreeSnapshot`] from it, and exposes the flat
//! row view a list widget actually paints. Everything stateful funnels
//! through here: expand/collapse, selection, the change feed, drag-and-drop
//! sessions, and inline renames. Side effects come out of a single event
//! queue the host drains after each call, so model callbacks never re-enter
//! the controller.
//!
//! # Example
//!
//! ```
//! use sourcelist::SourceList;
//! use sourcelist_core::{ItemId, SourceModel};
//!
//! # struct Shelf;
//! # impl SourceModel for Shelf {
//! #     fn roots(&self) -> Vec<ItemId> { vec![ItemId::new("library")] }
//! #     fn is_root(&self, id: &ItemId) -> bool { id.as_str() == "library" }
//! #     fn children_of(&self, id: &ItemId) -> Vec<ItemId> {
//! #         if self.is_root(id) {
//! #             vec![ItemId::new("inbox"), ItemId::new("archive")]
//! #         } else {
//! #             Vec::new()
//! #         }
//! #     }
//! #     fn display_name(&self, id: &ItemId) -> String { id.as_str().to_owned() }
//! #     fn set_display_name(&mut self, _id: &ItemId, _name: &str) {}
//! #     fn is_selectable(&self, id: &ItemId) -> bool { !self.is_root(id) }
//! # }
//! let mut list = SourceList::new(Shelf).unwrap();
//! assert_eq!(list.row_count(), 3);
//!
//! list.set_selected_rows(&[1]).unwrap();
//! assert_eq!(list.selected_items(), &[ItemId::new("inbox")]);
//! for event in list.drain_events() {
//!     // forward to the UI layer
//! }
//! ```

use sourcelist_core::{
    Capabilities, ChangeBatch, DragOperation, DragPayload, DropTarget, EntityKind, ItemId,
    RebuildScope, SourceListError, SourceListEvent, SourceModel,
};
use std::collections::vec_deque::Drain;
use std::collections::{HashSet, VecDeque};

#[cfg(feature = "tracing")]
use web_time::Instant;

use crate::changes::ChangeTracker;
use crate::drag::{self, DragPhase, DragSession};
use crate::edit::{ActiveEdit, EditOutcome, EditVerdict};
use crate::selection::Selection;
use crate::tree::TreeSnapshot;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One paintable line of the list, borrowed from the controller.
///
/// Rows are recomputed from the snapshot on demand; hold on to the
/// [`ItemId`], never to a row index, across calls that can reshape the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// Identifier of the item on this row.
    pub id: &'a ItemId,
    /// Display name at the last rebuild.
    pub name: &'a str,
    /// Icon key, if the model provides one.
    pub icon: Option<&'a str>,
    /// Nesting depth; roots are at zero.
    pub depth: usize,
    /// Whether this row is a group header (a root).
    pub is_group: bool,
    /// Whether the row may appear in the selection.
    pub selectable: bool,
    /// Whether the row accepts inline renames.
    pub editable: bool,
    /// Whether the row may be collapsed.
    pub collapsible: bool,
    /// Whether the item has children (visible or not).
    pub has_children: bool,
    /// Whether the children are currently shown.
    pub expanded: bool,
}

// ---------------------------------------------------------------------------
// SourceList
// ---------------------------------------------------------------------------

/// Headless source-list controller over a host [`SourceModel`].
pub struct SourceList<M: SourceModel> {
    model: M,
    tracker: ChangeTracker,
    tree: TreeSnapshot,
    collapsed: HashSet<ItemId>,
    selection: Selection,
    phase: DragPhase,
    session: Option<DragSession>,
    active_edit: Option<ActiveEdit>,
    pending: Option<RebuildScope>,
    events: VecDeque<SourceListEvent>,
}

impl<M: SourceModel> SourceList<M> {
    /// Build a controller without a change feed; call
    /// [`rebuild`](Self::rebuild) manually when the model changes.
    ///
    /// # Errors
    ///
    /// Fails when the model's declared capabilities are inconsistent or the
    /// initial tree cannot be derived; see
    /// [`with_watched_kinds`](Self::with_watched_kinds).
    pub fn new(model: M) -> Result<Self, SourceListError> {
        Self::with_watched_kinds(model, [])
    }

    /// Build a controller that reacts to change batches of the given entity
    /// kinds; see [`notify_change`](Self::notify_change).
    ///
    /// # Errors
    ///
    /// [`SourceListError::MissingCapability`] when the model allows
    /// reordering but declares neither [`Capabilities::INDEX_DROP`] nor
    /// [`Capabilities::ORDERING_INDEX`]: there would be no way to persist
    /// any order the user creates. Tree derivation errors
    /// ([`SourceListError::EmptyRoots`],
    /// [`SourceListError::DuplicateIdentifier`]) pass through.
    pub fn with_watched_kinds(
        model: M,
        kinds: impl IntoIterator<Item = EntityKind>,
    ) -> Result<Self, SourceListError> {
        if model.allows_reordering()
            && !model
                .capabilities()
                .intersects(Capabilities::INDEX_DROP | Capabilities::ORDERING_INDEX)
        {
            return Err(SourceListError::MissingCapability {
                needed: "INDEX_DROP or ORDERING_INDEX",
                reason: "the model allows reordering but offers no way to persist an order",
            });
        }
        let tree = TreeSnapshot::build(&model)?;
        Ok(Self {
            model,
            tracker: ChangeTracker::new(kinds),
            tree,
            collapsed: HashSet::new(),
            selection: Selection::default(),
            phase: DragPhase::Idle,
            session: None,
            active_edit: None,
            pending: None,
            events: VecDeque::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Rows
    // -----------------------------------------------------------------------

    /// The current rows, top to bottom, honoring collapse state.
    #[must_use]
    pub fn rows(&self) -> Vec<Row<'_>> {
        self.tree
            .visible(&self.collapsed)
            .into_iter()
            .filter_map(|(id, depth)| self.make_row(id, depth))
            .collect()
    }

    /// Number of visible rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tree.visible(&self.collapsed).len()
    }

    /// The row at `row`, if it is on screen.
    #[must_use]
    pub fn row_at(&self, row: usize) -> Option<Row<'_>> {
        let (id, depth) = self.tree.visible(&self.collapsed).get(row).copied()?;
        self.make_row(id, depth)
    }

    /// The visible row index of `id`, if it is on screen.
    #[must_use]
    pub fn row_of(&self, id: &ItemId) -> Option<usize> {
        self.tree
            .visible(&self.collapsed)
            .iter()
            .position(|(visible_id, _)| *visible_id == id)
    }

    fn make_row(&self, id: &ItemId, depth: usize) -> Option<Row<'_>> {
        let node = self.tree.get(id)?;
        Some(Row {
            id: node.id(),
            name: node.name(),
            icon: node.icon(),
            depth,
            is_group: node.is_root(),
            selectable: node.is_selectable(),
            editable: node.is_editable(),
            collapsible: node.is_collapsible(),
            has_children: node.has_children(),
            expanded: node.has_children() && !self.collapsed.contains(id),
        })
    }

    // -----------------------------------------------------------------------
    // Expand / collapse
    // -----------------------------------------------------------------------

    /// Whether the children of `id` are currently shown.
    #[must_use]
    pub fn is_expanded(&self, id: &ItemId) -> bool {
        self.tree.contains(id) && !self.collapsed.contains(id)
    }

    /// Hide the children of `id`. Returns `false` when the item is unknown,
    /// childless, not collapsible, or already collapsed.
    pub fn collapse(&mut self, id: &ItemId) -> bool {
        let can = self
            .tree
            .get(id)
            .is_some_and(|node| node.has_children() && node.is_collapsible());
        if !can {
            return false;
        }
        let collapsed = self.collapsed.insert(id.clone());
        if collapsed {
            #[cfg(feature = "tracing")]
            Self::log_toggle("collapse", id);
        }
        collapsed
    }

    /// Show the children of `id` again. Returns `false` when nothing was
    /// collapsed there.
    pub fn expand(&mut self, id: &ItemId) -> bool {
        let expanded = self.collapsed.remove(id);
        if expanded {
            #[cfg(feature = "tracing")]
            Self::log_toggle("expand", id);
        }
        expanded
    }

    /// Flip the collapse state of `id`; returns whether anything changed.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.collapsed.contains(id) {
            self.expand(id)
        } else {
            self.collapse(id)
        }
    }

    /// Show every row.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Collapse every collapsible item that has children.
    pub fn collapse_all(&mut self) {
        let ids: Vec<ItemId> = self
            .tree
            .display_order()
            .into_iter()
            .filter(|id| {
                self.tree
                    .get(id)
                    .is_some_and(|node| node.has_children() && node.is_collapsible())
            })
            .cloned()
            .collect();
        self.collapsed.extend(ids);
    }

    #[cfg(feature = "tracing")]
    fn log_toggle(action: &str, id: &ItemId) {
        tracing::debug!(message = "sourcelist.toggle", action, id = id.as_str());
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// The settled selection as identifiers, in display order.
    #[must_use]
    pub fn selected_items(&self) -> &[ItemId] {
        self.selection.items()
    }

    /// Replace the selection with the items on the given visible rows.
    ///
    /// Row indices are deduplicated and resolved in display order.
    /// Non-selectable rows (group headers in particular) are dropped
    /// silently, matching how list widgets treat clicks on headers. A
    /// [`SourceListEvent::SelectionChanged`] is queued only when the
    /// resolved set differs from the current one.
    ///
    /// # Errors
    ///
    /// [`SourceListError::RowOutOfBounds`] when any index is past the end;
    /// the selection is left untouched.
    pub fn set_selected_rows(&mut self, rows: &[usize]) -> Result<(), SourceListError> {
        let visible = self.tree.visible(&self.collapsed);
        let mut sorted = rows.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut items = Vec::with_capacity(sorted.len());
        for &row in &sorted {
            let Some((id, _)) = visible.get(row) else {
                return Err(SourceListError::RowOutOfBounds {
                    row,
                    rows: visible.len(),
                });
            };
            if self.tree.get(id).is_some_and(|node| node.is_selectable()) {
                items.push((*id).clone());
            }
        }
        if self.selection.replace(items) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "sourcelist.selection",
                count = self.selection.items().len()
            );
            self.events.push_back(SourceListEvent::SelectionChanged {
                items: self.selection.items().to_vec(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Change feed
    // -----------------------------------------------------------------------

    /// Feed one batch of store changes through the tracker.
    ///
    /// Batches without watched kinds are ignored outright. Otherwise the
    /// narrowest sufficient rebuild runs immediately, unless a drag is in
    /// flight, in which case the scope is parked and merged with later ones,
    /// and the combined rebuild runs when the session ends. Mutating the
    /// tree under an open drag would invalidate the session's row
    /// bookkeeping.
    ///
    /// # Errors
    ///
    /// Tree derivation errors are fatal; the controller should be dropped
    /// and rebuilt when one surfaces.
    pub fn notify_change(&mut self, batch: &ChangeBatch) -> Result<(), SourceListError> {
        let Some(scope) = self.tracker.plan(&self.model, &self.tree, batch) else {
            return Ok(());
        };
        if self.session.is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "sourcelist.changes",
                deferred = true,
                full = scope.is_full()
            );
            self.defer(scope);
            return Ok(());
        }
        self.run_rebuild(scope)
    }

    /// Force a full rebuild, regardless of any change feed.
    ///
    /// Deferred like [`notify_change`](Self::notify_change) while a drag is
    /// open.
    ///
    /// # Errors
    ///
    /// As for [`notify_change`](Self::notify_change).
    pub fn rebuild(&mut self) -> Result<(), SourceListError> {
        if self.session.is_some() {
            self.defer(RebuildScope::Full);
            return Ok(());
        }
        self.run_rebuild(RebuildScope::Full)
    }

    fn defer(&mut self, scope: RebuildScope) {
        self.pending = Some(match self.pending.take() {
            Some(parked) => parked.merge(scope),
            None => scope,
        });
    }

    fn flush_pending(&mut self) -> Result<(), SourceListError> {
        match self.pending.take() {
            Some(scope) => self.run_rebuild(scope),
            None => Ok(()),
        }
    }

    fn run_rebuild(&mut self, scope: RebuildScope) -> Result<(), SourceListError> {
        #[cfg(feature = "tracing")]
        let rebuild_start = Instant::now();
        #[cfg(feature = "tracing")]
        let rebuild_span = tracing::debug_span!(
            "sourcelist.rebuild",
            requested_full = scope.is_full(),
            nodes = tracing::field::Empty,
            rebuild_duration_us = tracing::field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _rebuild_guard = rebuild_span.enter();

        let executed = match scope {
            RebuildScope::Subtree(parent) if self.tree.contains(&parent) => {
                self.tree.rebuild_subtree(&self.model, &parent)?;
                RebuildScope::Subtree(parent)
            }
            // A subtree whose parent vanished, or an explicit full request.
            _ => {
                self.tree = TreeSnapshot::build(&self.model)?;
                RebuildScope::Full
            }
        };

        #[cfg(feature = "tracing")]
        {
            let elapsed_us = rebuild_start.elapsed().as_micros() as u64;
            rebuild_span.record("nodes", self.tree.len() as u64);
            rebuild_span.record("rebuild_duration_us", elapsed_us);
            tracing::debug!(
                message = "sourcelist.rebuild",
                full = executed.is_full(),
                nodes = self.tree.len(),
                rebuild_duration_us = elapsed_us
            );
        }

        self.events
            .push_back(SourceListEvent::TreeRebuilt { scope: executed });

        let tree = &self.tree;
        self.collapsed.retain(|id| tree.contains(id));
        if self.selection.reconcile(&self.tree) {
            self.events.push_back(SourceListEvent::SelectionChanged {
                items: self.selection.items().to_vec(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drag and drop
    // -----------------------------------------------------------------------

    /// Open a drag session for the items on the given visible rows.
    ///
    /// # Errors
    ///
    /// [`SourceListError::DragInProgress`] when a session is already open;
    /// [`SourceListError::RowOutOfBounds`] for bad indices;
    /// [`SourceListError::DragRejected`] when the model has internal drags
    /// disabled, a group header is among the rows, the row set is empty, or
    /// the model turns the items down.
    pub fn begin_drag(&mut self, rows: &[usize]) -> Result<(), SourceListError> {
        if self.session.is_some() {
            return Err(SourceListError::DragInProgress);
        }
        if !self.model.supports_internal_drag() {
            return Err(SourceListError::DragRejected {
                reason: "internal drag-and-drop is disabled",
            });
        }
        let visible = self.tree.visible(&self.collapsed);
        let mut sorted = rows.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut items = Vec::with_capacity(sorted.len());
        for &row in &sorted {
            let Some((id, _)) = visible.get(row) else {
                return Err(SourceListError::RowOutOfBounds {
                    row,
                    rows: visible.len(),
                });
            };
            if self.tree.get(id).is_some_and(|node| node.is_root()) {
                return Err(SourceListError::DragRejected {
                    reason: "root rows cannot be dragged",
                });
            }
            items.push((*id).clone());
        }
        if items.is_empty() {
            return Err(SourceListError::DragRejected {
                reason: "nothing to drag",
            });
        }
        if !self.model.allows_drag(&items) {
            return Err(SourceListError::DragRejected {
                reason: "the model refused the dragged items",
            });
        }
        self.session = Some(DragSession::capture(&self.tree, items));
        self.set_phase(DragPhase::Dragging, "begin");
        Ok(())
    }

    /// Ask whether a drop on `target` would be allowed, without performing
    /// it. The session stays open either way.
    ///
    /// Returns the operation the drop would use, or
    /// [`DragOperation::None`] when it would be refused.
    ///
    /// # Errors
    ///
    /// [`SourceListError::NoActiveDrag`] when no session is open.
    pub fn validate_drop(&mut self, target: &DropTarget) -> Result<DragOperation, SourceListError> {
        let verdict = match self.session.as_ref() {
            Some(session) => drag::validate(&self.model, &self.tree, session, target),
            None => return Err(SourceListError::NoActiveDrag),
        };
        self.set_phase(DragPhase::Validating, "validate");
        match verdict {
            Ok(operation) => {
                self.set_phase(DragPhase::Dragging, "allow");
                Ok(operation)
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "sourcelist.drop", allowed = false, reason);
                #[cfg(not(feature = "tracing"))]
                let _ = reason;
                self.set_phase(DragPhase::Dragging, "deny");
                Ok(DragOperation::None)
            }
        }
    }

    /// Re-validate and perform the drop, consuming the session.
    ///
    /// Drops *onto* an item go through
    /// [`SourceModel::accept_item_drop`]. Drops *between* siblings go
    /// through [`SourceModel::accept_index_drop`] when the model declares
    /// [`Capabilities::INDEX_DROP`]; otherwise the controller persists the
    /// order itself, handing reparented items to `accept_item_drop` first
    /// and then writing a dense zero-based index for every sibling whose
    /// position changed. The affected subtrees are rebuilt before this
    /// returns, together with any rebuilds deferred during the session.
    ///
    /// # Errors
    ///
    /// [`SourceListError::NoActiveDrag`] with no session;
    /// [`SourceListError::DropRejected`] when validation or the model turns
    /// the drop down; [`SourceListError::MissingCapability`] when the model
    /// cannot persist what the drop requires, in which case nothing is
    /// written. The session is consumed on every outcome except
    /// `NoActiveDrag`.
    pub fn accept_drop(&mut self, target: &DropTarget) -> Result<DragOperation, SourceListError> {
        if self.session.is_none() {
            return Err(SourceListError::NoActiveDrag);
        }
        self.set_phase(DragPhase::Validating, "validate");
        let outcome = self.perform_drop(target);
        self.session = None;
        match &outcome {
            Ok(operation) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "sourcelist.drop", allowed = true, operation = ?operation);
                #[cfg(not(feature = "tracing"))]
                let _ = operation;
                self.set_phase(DragPhase::Accepted, "accept");
            }
            Err(_) => self.set_phase(DragPhase::Rejected, "reject"),
        }
        self.set_phase(DragPhase::Idle, "idle");
        self.flush_pending()?;
        outcome
    }

    /// Abandon the open session without dropping.
    ///
    /// Rebuilds deferred during the session run before this returns.
    ///
    /// # Errors
    ///
    /// [`SourceListError::NoActiveDrag`] when no session is open; rebuild
    /// errors pass through.
    pub fn cancel_drag(&mut self) -> Result<(), SourceListError> {
        if self.session.take().is_none() {
            return Err(SourceListError::NoActiveDrag);
        }
        self.set_phase(DragPhase::Rejected, "cancel");
        self.set_phase(DragPhase::Idle, "idle");
        self.flush_pending()
    }

    fn perform_drop(&mut self, target: &DropTarget) -> Result<DragOperation, SourceListError> {
        let Some(session) = self.session.as_ref() else {
            return Err(SourceListError::NoActiveDrag);
        };
        let operation = match drag::validate(&self.model, &self.tree, session, target) {
            Ok(operation) => operation,
            Err(reason) => return Err(SourceListError::DropRejected { reason }),
        };
        match target {
            DropTarget::On(on) => {
                let items = session.items().to_vec();
                let mut scope = RebuildScope::Subtree(on.clone());
                for origin in session.origins() {
                    scope = scope.merge(match &origin.parent {
                        Some(parent) => RebuildScope::Subtree(parent.clone()),
                        None => RebuildScope::Full,
                    });
                }
                if !self.model.capabilities().contains(Capabilities::ITEM_DROP) {
                    return Err(SourceListError::MissingCapability {
                        needed: "ITEM_DROP",
                        reason: "dropping onto an item needs an item-drop handler",
                    });
                }
                if !self.model.accept_item_drop(&items, on) {
                    return Err(SourceListError::DropRejected {
                        reason: "the model refused the drop",
                    });
                }
                self.defer(scope);
                Ok(operation)
            }
            DropTarget::Between {
                parent: Some(parent),
                index,
            } => {
                let plan = drag::plan_reorder(&self.tree, session.items(), parent, *index)?;
                let items = session.items().to_vec();
                let mut scope = RebuildScope::Subtree(parent.clone());
                for (group, _) in plan.orders.iter().skip(1) {
                    scope = scope.merge(RebuildScope::Subtree(group.clone()));
                }

                let caps = self.model.capabilities();
                if caps.contains(Capabilities::INDEX_DROP) {
                    if !self.model.accept_index_drop(&items, parent, *index) {
                        return Err(SourceListError::DropRejected {
                            reason: "the model refused the drop",
                        });
                    }
                } else {
                    if !caps.contains(Capabilities::ORDERING_INDEX) {
                        return Err(SourceListError::MissingCapability {
                            needed: "INDEX_DROP or ORDERING_INDEX",
                            reason: "the model offers no way to persist the new order",
                        });
                    }
                    if !plan.reparented.is_empty() {
                        if !caps.contains(Capabilities::ITEM_DROP) {
                            return Err(SourceListError::MissingCapability {
                                needed: "ITEM_DROP",
                                reason: "moving items between parents needs an item-drop handler",
                            });
                        }
                        if !self.model.accept_item_drop(&plan.reparented, parent) {
                            return Err(SourceListError::DropRejected {
                                reason: "the model refused the drop",
                            });
                        }
                    }
                    for write in &plan.writes {
                        self.model.set_ordering_index(&write.id, write.index);
                    }
                }
                self.defer(scope);
                Ok(operation)
            }
            DropTarget::Between { parent: None, .. } => Err(SourceListError::DropRejected {
                reason: "root-level reordering is not supported",
            }),
        }
    }

    fn set_phase(&mut self, phase: DragPhase, action: &'static str) {
        self.phase = phase;
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sourcelist.drag", action, phase = ?phase);
        #[cfg(not(feature = "tracing"))]
        let _ = action;
    }

    // -----------------------------------------------------------------------
    // External payloads
    // -----------------------------------------------------------------------

    /// Hand a payload from outside the widget to the model.
    ///
    /// The payload kind must match one of the model's
    /// [`external_payload_kinds`](SourceModel::external_payload_kinds)
    /// patterns and the model must declare
    /// [`Capabilities::EXTERNAL_DROP`]. Unlike internal drags, the target
    /// may be a slot between roots; that rebuilds the whole tree, since the
    /// root set can change.
    ///
    /// # Errors
    ///
    /// [`SourceListError::DragInProgress`] while an internal session is
    /// open; [`SourceListError::DropRejected`] for unsupported kinds,
    /// unknown targets, or a model refusal;
    /// [`SourceListError::MissingCapability`] without `EXTERNAL_DROP`.
    pub fn drop_external(
        &mut self,
        payload: &DragPayload,
        target: &DropTarget,
    ) -> Result<(), SourceListError> {
        if self.session.is_some() {
            return Err(SourceListError::DragInProgress);
        }
        let kinds = self.model.external_payload_kinds();
        if !payload.matches_any(&kinds) {
            return Err(SourceListError::DropRejected {
                reason: "payload kind is not supported",
            });
        }
        if !self
            .model
            .capabilities()
            .contains(Capabilities::EXTERNAL_DROP)
        {
            return Err(SourceListError::MissingCapability {
                needed: "EXTERNAL_DROP",
                reason: "the model does not accept external payloads",
            });
        }
        let scope = match target {
            DropTarget::On(on) => {
                if !self.tree.contains(on) {
                    return Err(SourceListError::DropRejected {
                        reason: "drop target is not in the tree",
                    });
                }
                RebuildScope::Subtree(on.clone())
            }
            DropTarget::Between {
                parent: Some(parent),
                ..
            } => {
                if !self.tree.contains(parent) {
                    return Err(SourceListError::DropRejected {
                        reason: "drop target is not in the tree",
                    });
                }
                RebuildScope::Subtree(parent.clone())
            }
            DropTarget::Between { parent: None, .. } => RebuildScope::Full,
        };
        if !self.model.accept_external_drop(payload, target) {
            return Err(SourceListError::DropRejected {
                reason: "the model refused the payload",
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sourcelist.drop",
            external = true,
            kind = payload.kind.as_str()
        );
        self.run_rebuild(scope)
    }

    // -----------------------------------------------------------------------
    // Inline editing
    // -----------------------------------------------------------------------

    /// Start renaming the item on `row`; returns the text to edit.
    ///
    /// # Errors
    ///
    /// [`SourceListError::EditInProgress`] when an edit is already open;
    /// [`SourceListError::RowOutOfBounds`] for a bad index;
    /// [`SourceListError::NotEditable`] when the model does not allow
    /// renaming this item (group headers never do).
    pub fn begin_edit(&mut self, row: usize) -> Result<String, SourceListError> {
        if self.active_edit.is_some() {
            return Err(SourceListError::EditInProgress);
        }
        let visible = self.tree.visible(&self.collapsed);
        let Some((id, _)) = visible.get(row).copied() else {
            return Err(SourceListError::RowOutOfBounds {
                row,
                rows: visible.len(),
            });
        };
        let id = id.clone();
        let Some(node) = self.tree.get(&id) else {
            return Err(SourceListError::UnknownItem { id });
        };
        if !node.is_editable() {
            return Err(SourceListError::NotEditable { id });
        }
        let original = node.name().to_owned();
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sourcelist.edit", action = "begin", id = id.as_str());
        self.active_edit = Some(ActiveEdit {
            id,
            original: original.clone(),
        });
        Ok(original)
    }

    /// Finish the open edit with the text the user typed.
    ///
    /// An unchanged name commits without consulting or writing the model. A
    /// validated name is written through [`SourceModel::set_display_name`]
    /// and patched into the snapshot without a rebuild. A vetoed name writes
    /// nothing: the outcome carries the text to restore and a
    /// [`SourceListEvent::EditRejected`] is queued so the host can explain.
    ///
    /// # Errors
    ///
    /// [`SourceListError::NoActiveEdit`] when no edit is open;
    /// [`SourceListError::UnknownItem`] when the item vanished in a rebuild
    /// since the edit began (the edit is discarded).
    pub fn commit_edit(&mut self, proposed: &str) -> Result<EditOutcome, SourceListError> {
        let Some(edit) = self.active_edit.take() else {
            return Err(SourceListError::NoActiveEdit);
        };
        if !self.tree.contains(&edit.id) {
            return Err(SourceListError::UnknownItem { id: edit.id });
        }
        match edit.review(&self.model, proposed) {
            EditVerdict::Unchanged => {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "sourcelist.edit", action = "commit", changed = false);
                Ok(EditOutcome::Committed)
            }
            EditVerdict::Accepted => {
                self.model.set_display_name(&edit.id, proposed);
                self.tree.rename(&edit.id, proposed);
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "sourcelist.edit", action = "commit", changed = true);
                Ok(EditOutcome::Committed)
            }
            EditVerdict::Rejected => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    message = "sourcelist.edit",
                    action = "revert",
                    id = edit.id.as_str()
                );
                self.events.push_back(SourceListEvent::EditRejected {
                    id: edit.id,
                    proposed: proposed.to_owned(),
                    restored: edit.original.clone(),
                });
                Ok(EditOutcome::Reverted {
                    restored: edit.original,
                })
            }
        }
    }

    /// Abandon the open edit; returns the text to restore.
    ///
    /// # Errors
    ///
    /// [`SourceListError::NoActiveEdit`] when no edit is open.
    pub fn cancel_edit(&mut self) -> Result<String, SourceListError> {
        let Some(edit) = self.active_edit.take() else {
            return Err(SourceListError::NoActiveEdit);
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sourcelist.edit", action = "cancel", id = edit.id.as_str());
        Ok(edit.original)
    }

    /// The item currently being renamed, if any.
    #[must_use]
    pub fn editing_item(&self) -> Option<&ItemId> {
        self.active_edit.as_ref().map(|edit| &edit.id)
    }

    // -----------------------------------------------------------------------
    // Events and accessors
    // -----------------------------------------------------------------------

    /// Drain everything queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Drain<'_, SourceListEvent> {
        self.events.drain(..)
    }

    /// Whether anything is waiting in the event queue.
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// The wrapped model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the wrapped model.
    ///
    /// The controller does not see direct mutations; follow them with
    /// [`notify_change`](Self::notify_change) or [`rebuild`](Self::rebuild).
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// The current tree snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &TreeSnapshot {
        &self.tree
    }

    /// Resting phase of the drag machine.
    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.phase
    }

    /// The open drag session, if any.
    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Number of children of `id`, if it is in the tree.
    #[must_use]
    pub fn child_count(&self, id: &ItemId) -> Option<usize> {
        self.tree.children_of(id).map(|children| children.len())
    }
}

// ---------------------------------------------------------------------------
// View-state persistence
// ---------------------------------------------------------------------------

#[cfg(feature = "state-persistence")]
impl<M: SourceModel> SourceList<M> {
    /// Capture collapse state and selection for storage.
    #[must_use]
    pub fn save_state(&self) -> crate::state::SourceListState {
        crate::state::SourceListState {
            collapsed: self.collapsed.clone(),
            selected: self.selection.items().to_vec(),
        }
    }

    /// Re-apply stored view state.
    ///
    /// Identifiers the tree no longer has are dropped; the restored
    /// selection is reordered to display order. Queues
    /// [`SourceListEvent::SelectionChanged`] when the selection ends up
    /// different.
    pub fn restore_state(&mut self, state: crate::state::SourceListState) {
        let restored: HashSet<ItemId> = state
            .collapsed
            .into_iter()
            .filter(|id| self.tree.contains(id))
            .collect();
        self.collapsed = restored;

        let held: HashSet<ItemId> = state.selected.into_iter().collect();
        let items: Vec<ItemId> = self
            .tree
            .display_order()
            .into_iter()
            .filter(|id| held.contains(*id))
            .filter(|id| self.tree.get(id).is_some_and(|node| node.is_selectable()))
            .cloned()
            .collect();
        if self.selection.replace(items) {
            self.events.push_back(SourceListEvent::SelectionChanged {
                items: self.selection.items().to_vec(),
            });
        }
    }
}

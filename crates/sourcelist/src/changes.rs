//! Change-feed filtering and rebuild scoping.
//!
//! Hosts forward store notifications as a [`ChangeBatch`]; the tracker
//! decides whether anything in the batch matters (by entity kind) and, when
//! it does, how little of the tree can be rebuilt to absorb it. One batch
//! folds down to a single [`RebuildScope`]: touching one sibling group plans
//! a subtree rebuild under its parent, anything wider escalates to a full
//! rebuild.

use sourcelist_core::{ChangeBatch, ChangedObject, EntityKind, RebuildScope, SourceModel};
use std::collections::HashSet;

use crate::tree::TreeSnapshot;

/// Decides which store changes are worth a rebuild, and how big a rebuild.
///
/// A tracker with no watched kinds is inert: every batch planned through it
/// yields `None`. This is the default for hosts that call
/// [`rebuild`](crate::SourceList::rebuild) manually instead of wiring up a
/// change feed.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    watched: HashSet<EntityKind>,
}

impl ChangeTracker {
    /// Track the given entity kinds; everything else is ignored.
    pub fn new(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            watched: kinds.into_iter().collect(),
        }
    }

    /// Whether no kinds are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Whether a given kind is tracked.
    #[must_use]
    pub fn watches(&self, kind: &EntityKind) -> bool {
        self.watched.contains(kind)
    }

    /// Fold a batch into the narrowest rebuild that absorbs it.
    ///
    /// Returns `None` when the batch holds nothing of a watched kind (or the
    /// tracker is inert). Insertions and updates scope to the parent the
    /// model reports for the item; deletions scope to the parent the
    /// snapshot last recorded, since the model has already forgotten the
    /// item. Any change whose parent cannot be pinned down (a new or moved
    /// root, or a parent the snapshot has never seen) escalates to
    /// [`RebuildScope::Full`].
    #[must_use]
    pub fn plan<M: SourceModel>(
        &self,
        model: &M,
        tree: &TreeSnapshot,
        batch: &ChangeBatch,
    ) -> Option<RebuildScope> {
        if self.watched.is_empty() {
            return None;
        }
        let mut planned: Option<RebuildScope> = None;
        let mut fold = |scope: RebuildScope| {
            planned = Some(match planned.take() {
                Some(existing) => existing.merge(scope),
                None => scope,
            });
        };

        for object in batch.inserted.iter().chain(&batch.updated) {
            if !self.watches(&object.kind) {
                continue;
            }
            fold(self.live_scope(model, tree, object));
            // An update can be a move; cover the branch the item came from.
            if let Some(old_parent) = tree.parent_of(&object.id) {
                fold(RebuildScope::Subtree(old_parent.clone()));
            }
        }
        for object in &batch.deleted {
            if !self.watches(&object.kind) {
                continue;
            }
            fold(match tree.parent_of(&object.id) {
                Some(parent) => RebuildScope::Subtree(parent.clone()),
                None => RebuildScope::Full,
            });
        }
        planned
    }

    fn live_scope<M: SourceModel>(
        &self,
        model: &M,
        tree: &TreeSnapshot,
        object: &ChangedObject,
    ) -> RebuildScope {
        match model.parent_of(&object.id) {
            Some(parent) if tree.contains(&parent) => RebuildScope::Subtree(parent),
            // Parent the snapshot has never seen: the branch shape changed
            // more than one level deep, so rebuild everything.
            Some(_) => RebuildScope::Full,
            // Root-level item; the root set itself may have changed.
            None => RebuildScope::Full,
        }
    }
}

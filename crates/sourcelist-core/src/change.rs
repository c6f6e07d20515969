//! External change-feed types and rebuild scoping.
//!
//! The backing store (whatever it is) reports mutations as a [`ChangeBatch`]
//! of inserted, updated, and deleted object references, each tagged with its
//! [`EntityKind`]. The controller filters the batch against the kinds it was
//! constructed to watch and plans a [`RebuildScope`] from the survivors.

use crate::id::ItemId;
use std::fmt;

/// Category of backing-store object, e.g. an entity or table name.
///
/// Kinds are compared verbatim; `"Folder"` and `"folder"` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKind(String);

impl EntityKind {
    /// Create a kind from a host-defined category name.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// The kind as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_owned())
    }
}

impl From<String> for EntityKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

/// One mutated object reference within a [`ChangeBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedObject {
    /// Identifier of the mutated object.
    pub id: ItemId,
    /// Category of the mutated object.
    pub kind: EntityKind,
}

impl ChangedObject {
    /// Create a changed-object reference.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, kind: impl Into<EntityKind>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// A set of backing-store mutations delivered in one notification.
///
/// # Example
///
/// ```
/// use sourcelist_core::{ChangeBatch, ChangedObject};
///
/// let batch = ChangeBatch::default()
///     .with_inserted([ChangedObject::new("drafts", "Folder")])
///     .with_updated([ChangedObject::new("inbox", "Folder")]);
/// assert_eq!(batch.len(), 2);
/// assert!(!batch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Objects created since the last notification.
    pub inserted: Vec<ChangedObject>,
    /// Objects whose attributes or relationships changed.
    pub updated: Vec<ChangedObject>,
    /// Objects removed from the store.
    pub deleted: Vec<ChangedObject>,
}

impl ChangeBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append inserted-object references.
    #[must_use]
    pub fn with_inserted(mut self, objects: impl IntoIterator<Item = ChangedObject>) -> Self {
        self.inserted.extend(objects);
        self
    }

    /// Append updated-object references.
    #[must_use]
    pub fn with_updated(mut self, objects: impl IntoIterator<Item = ChangedObject>) -> Self {
        self.updated.extend(objects);
        self
    }

    /// Append deleted-object references.
    #[must_use]
    pub fn with_deleted(mut self, objects: impl IntoIterator<Item = ChangedObject>) -> Self {
        self.deleted.extend(objects);
        self
    }

    /// Total number of object references across all three phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }

    /// Whether the batch carries no references at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// All object references: inserted, then updated, then deleted.
    pub fn objects(&self) -> impl Iterator<Item = &ChangedObject> {
        self.inserted
            .iter()
            .chain(self.updated.iter())
            .chain(self.deleted.iter())
    }
}

/// Scope of a pending tree rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildScope {
    /// Re-derive the whole tree from the adapter's roots.
    Full,
    /// Re-derive only the subtree under one parent.
    Subtree(ItemId),
}

impl RebuildScope {
    /// Merge two scopes.
    ///
    /// Matching subtrees stay narrow; anything else widens to [`Self::Full`].
    /// Two distinct subtrees could in principle rebuild independently, but
    /// tracking overlap (one being an ancestor of the other) costs more than
    /// the full rebuild it avoids on source-list-sized trees.
    #[must_use]
    pub fn merge(self, other: RebuildScope) -> RebuildScope {
        match (self, other) {
            (RebuildScope::Subtree(a), RebuildScope::Subtree(b)) if a == b => {
                RebuildScope::Subtree(a)
            }
            _ => RebuildScope::Full,
        }
    }

    /// Whether this scope is the full-tree rebuild.
    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, RebuildScope::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts() {
        let batch = ChangeBatch::new()
            .with_inserted([ChangedObject::new("a", "Folder")])
            .with_deleted([ChangedObject::new("b", "Feed")]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.objects().count(), 2);
        assert!(!batch.is_empty());
        assert!(ChangeBatch::new().is_empty());
    }

    #[test]
    fn batch_objects_order_is_insert_update_delete() {
        let batch = ChangeBatch::new()
            .with_deleted([ChangedObject::new("d", "Folder")])
            .with_updated([ChangedObject::new("u", "Folder")])
            .with_inserted([ChangedObject::new("i", "Folder")]);
        let ids: Vec<&str> = batch.objects().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["i", "u", "d"]);
    }

    #[test]
    fn scope_merge_same_subtree_stays_narrow() {
        let a = RebuildScope::Subtree(ItemId::new("folders"));
        let b = RebuildScope::Subtree(ItemId::new("folders"));
        assert_eq!(a.merge(b), RebuildScope::Subtree(ItemId::new("folders")));
    }

    #[test]
    fn scope_merge_distinct_subtrees_widens() {
        let a = RebuildScope::Subtree(ItemId::new("folders"));
        let b = RebuildScope::Subtree(ItemId::new("feeds"));
        assert!(a.merge(b).is_full());
    }

    #[test]
    fn scope_merge_full_wins() {
        let a = RebuildScope::Full;
        let b = RebuildScope::Subtree(ItemId::new("folders"));
        assert!(a.clone().merge(b.clone()).is_full());
        assert!(b.merge(a).is_full());
    }

    #[test]
    fn kind_comparison_is_verbatim() {
        assert_ne!(EntityKind::new("Folder"), EntityKind::new("folder"));
        assert_eq!(EntityKind::from("Feed"), EntityKind::new("Feed"));
    }
}

//! Identifier-indexed tree snapshot derived from a [`SourceModel`].
//!
//! The snapshot is the controller's own copy of the hierarchy: one
//! [`TreeNode`] per item, holding the parent link, the ordered child list,
//! and the display attributes read from the model at the last rebuild. It is
//! rebuilt wholesale, fully or one subtree at a time, rather than patched
//! node-by-node, which keeps it impossible to observe in a half-updated
//! state.
//!
//! # Example
//!
//! ```
//! use sourcelist::tree::TreeSnapshot;
//! use sourcelist_core::{ItemId, SourceModel};
//!
//! # struct Flat;
//! # impl SourceModel for Flat {
//! #     fn roots(&self) -> Vec<ItemId> { vec![ItemId::new("library")] }
//! #     fn is_root(&self, id: &ItemId) -> bool { id.as_str() == "library" }
//! #     fn children_of(&self, id: &ItemId) -> Vec<ItemId> {
//! #         if self.is_root(id) { vec![ItemId::new("inbox")] } else { Vec::new() }
//! #     }
//! #     fn display_name(&self, id: &ItemId) -> String { id.as_str().to_owned() }
//! #     fn set_display_name(&mut self, _id: &ItemId, _name: &str) {}
//! #     fn is_selectable(&self, id: &ItemId) -> bool { !self.is_root(id) }
//! # }
//! let tree = TreeSnapshot::build(&Flat).unwrap();
//! assert_eq!(tree.len(), 2);
//! assert!(tree.contains(&ItemId::new("inbox")));
//! ```

use ahash::AHashMap;
use sourcelist_core::{
    Capabilities, ItemId, SortDescriptor, SortKey, SortValue, SourceListError, SourceModel,
};
use std::cmp::Ordering;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// TreeNode
// ---------------------------------------------------------------------------

/// One materialized item in the snapshot.
///
/// Attributes are cached from the model at the rebuild that produced the
/// node; they go stale only until the next change notification rebuilds the
/// subtree they live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    id: ItemId,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    name: String,
    icon: Option<String>,
    is_root: bool,
    selectable: bool,
    editable: bool,
    collapsible: bool,
    ordering_index: Option<i64>,
}

impl TreeNode {
    fn read<M: SourceModel>(model: &M, id: &ItemId, parent: Option<ItemId>, spec: &SortSpec) -> Self {
        let is_root = model.is_root(id);
        Self {
            id: id.clone(),
            parent,
            children: Vec::new(),
            name: model.display_name(id),
            icon: model.icon(id),
            is_root,
            // Group headers never select or rename, whatever the model says.
            selectable: !is_root && model.is_selectable(id),
            editable: !is_root && model.is_editable(id),
            collapsible: model.is_collapsible(id),
            ordering_index: if spec.use_index {
                model.ordering_index(id)
            } else {
                None
            },
        }
    }

    /// The item's identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Parent identifier; `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }

    /// Ordered child identifiers.
    #[must_use]
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Cached display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cached icon key, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Whether this is a root (group header).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether the item may appear in the selection.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Whether the item accepts inline renames.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Whether the item may be collapsed.
    #[must_use]
    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    /// Whether the item has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Cached ordering index, if the model declares the capability.
    #[must_use]
    pub fn ordering_index(&self) -> Option<i64> {
        self.ordering_index
    }
}

// ---------------------------------------------------------------------------
// Sibling ordering
// ---------------------------------------------------------------------------

struct SortSpec {
    descriptors: Vec<SortDescriptor>,
    use_index: bool,
}

impl SortSpec {
    fn read<M: SourceModel>(model: &M) -> Self {
        Self {
            descriptors: model.sort_descriptors(),
            use_index: model
                .capabilities()
                .contains(Capabilities::ORDERING_INDEX),
        }
    }
}

fn compare_indexes(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: Option<SortValue>, b: Option<SortValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_siblings<M: SourceModel>(
    model: &M,
    spec: &SortSpec,
    a: &ItemId,
    b: &ItemId,
) -> Ordering {
    for descriptor in &spec.descriptors {
        let ord = match &descriptor.key {
            SortKey::DisplayName => model.display_name(a).cmp(&model.display_name(b)),
            SortKey::OrderingIndex => {
                compare_indexes(model.ordering_index(a), model.ordering_index(b))
            }
            SortKey::Field(field) => {
                compare_values(model.sort_value(a, field), model.sort_value(b, field))
            }
        };
        let ord = if descriptor.ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    if spec.use_index {
        return compare_indexes(model.ordering_index(a), model.ordering_index(b));
    }
    Ordering::Equal
}

/// Order one sibling group: descriptors first, then the ordering index when
/// the model persists one, then the model's declared order (stable sort).
fn sort_siblings<M: SourceModel>(ids: &mut [ItemId], model: &M, spec: &SortSpec) {
    if spec.descriptors.is_empty() && !spec.use_index {
        return;
    }
    ids.sort_by(|a, b| compare_siblings(model, spec, a, b));
}

// ---------------------------------------------------------------------------
// TreeSnapshot
// ---------------------------------------------------------------------------

/// The derived tree: ordered roots plus an identifier-indexed node map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeSnapshot {
    roots: Vec<ItemId>,
    nodes: AHashMap<ItemId, TreeNode>,
}

impl TreeSnapshot {
    /// Derive a fresh snapshot from the model's current answers.
    ///
    /// # Errors
    ///
    /// [`SourceListError::EmptyRoots`] when the model reports no roots;
    /// [`SourceListError::DuplicateIdentifier`] when any identifier appears
    /// twice, which is also how a cycle in the `children_of` answers
    /// surfaces, since the walk revisits an already-inserted identifier
    /// instead of recursing forever.
    pub fn build<M: SourceModel>(model: &M) -> Result<Self, SourceListError> {
        let mut roots = model.roots();
        if roots.is_empty() {
            return Err(SourceListError::EmptyRoots);
        }
        let spec = SortSpec::read(model);
        sort_siblings(&mut roots, model, &spec);

        let mut snapshot = Self {
            roots: Vec::new(),
            nodes: AHashMap::new(),
        };
        for root in &roots {
            snapshot.insert_subtree(model, root.clone(), None, &spec)?;
        }
        snapshot.roots = roots;
        Ok(snapshot)
    }

    /// Discard and re-derive the subtree under `parent`.
    ///
    /// The parent's own cached attributes are re-read; its identity, parent
    /// link, and sibling position are untouched. Duplicate detection runs
    /// against the remainder of the tree, so an item that "moved into" the
    /// rebuilt subtree while still listed elsewhere is caught.
    ///
    /// # Errors
    ///
    /// [`SourceListError::UnknownItem`] when `parent` is not in the
    /// snapshot; [`SourceListError::DuplicateIdentifier`] as for
    /// [`build`](Self::build). On error the snapshot must be considered
    /// unusable and rebuilt from scratch.
    pub fn rebuild_subtree<M: SourceModel>(
        &mut self,
        model: &M,
        parent: &ItemId,
    ) -> Result<(), SourceListError> {
        let (parent_link, old_children) = match self.nodes.get(parent) {
            Some(node) => (node.parent.clone(), node.children.clone()),
            None => {
                return Err(SourceListError::UnknownItem {
                    id: parent.clone(),
                });
            }
        };
        for child in &old_children {
            self.remove_subtree(child);
        }

        let spec = SortSpec::read(model);
        let mut refreshed = TreeNode::read(model, parent, parent_link, &spec);
        let mut children = model.children_of(parent);
        sort_siblings(&mut children, model, &spec);
        refreshed.children = children.clone();
        self.nodes.insert(parent.clone(), refreshed);

        for child in children {
            self.insert_subtree(model, child, Some(parent.clone()), &spec)?;
        }
        Ok(())
    }

    fn insert_subtree<M: SourceModel>(
        &mut self,
        model: &M,
        id: ItemId,
        parent: Option<ItemId>,
        spec: &SortSpec,
    ) -> Result<(), SourceListError> {
        if self.nodes.contains_key(&id) {
            return Err(SourceListError::DuplicateIdentifier { id });
        }
        let mut node = TreeNode::read(model, &id, parent, spec);
        let mut children = model.children_of(&id);
        sort_siblings(&mut children, model, spec);
        node.children = children.clone();
        self.nodes.insert(id.clone(), node);

        for child in children {
            self.insert_subtree(model, child, Some(id.clone()), spec)?;
        }
        Ok(())
    }

    fn remove_subtree(&mut self, id: &ItemId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in &node.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Update one cached display name in place.
    pub(crate) fn rename(&mut self, id: &ItemId, name: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.name = name.to_owned();
                true
            }
            None => false,
        }
    }

    /// Ordered root identifiers.
    #[must_use]
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Look up one node.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Whether `id` is in the snapshot.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of `id`; `None` for roots and unknown identifiers.
    #[must_use]
    pub fn parent_of(&self, id: &ItemId) -> Option<&ItemId> {
        self.nodes.get(id).and_then(|node| node.parent.as_ref())
    }

    /// Ordered children of `id`, if it is in the snapshot.
    #[must_use]
    pub fn children_of(&self, id: &ItemId) -> Option<&[ItemId]> {
        self.nodes.get(id).map(|node| node.children.as_slice())
    }

    /// Position of `id` within its sibling group (roots included).
    #[must_use]
    pub fn position_in_parent(&self, id: &ItemId) -> Option<usize> {
        let node = self.nodes.get(id)?;
        let siblings = match &node.parent {
            Some(parent) => self.nodes.get(parent)?.children.as_slice(),
            None => self.roots.as_slice(),
        };
        siblings.iter().position(|sibling| sibling == id)
    }

    /// Whether `id` sits anywhere below `ancestor`.
    ///
    /// Follows parent links, so the cost is the depth of `id`, not the size
    /// of the tree. An item is not its own descendant.
    #[must_use]
    pub fn is_descendant_of(&self, id: &ItemId, ancestor: &ItemId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// Visible identifiers with depths, in display order.
    ///
    /// Children of an identifier in `collapsed` are skipped; the collapsed
    /// node itself is visible.
    #[must_use]
    pub fn visible<'a>(&'a self, collapsed: &HashSet<ItemId>) -> Vec<(&'a ItemId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.walk_visible(root, 0, collapsed, &mut out);
        }
        out
    }

    fn walk_visible<'a>(
        &'a self,
        id: &ItemId,
        depth: usize,
        collapsed: &HashSet<ItemId>,
        out: &mut Vec<(&'a ItemId, usize)>,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.push((&node.id, depth));
        if !collapsed.contains(id) {
            for child in &node.children {
                self.walk_visible(child, depth + 1, collapsed, out);
            }
        }
    }

    /// Every identifier in display order, ignoring collapse state.
    #[must_use]
    pub fn display_order(&self) -> Vec<&ItemId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.walk_all(root, &mut out);
        }
        out
    }

    fn walk_all<'a>(&'a self, id: &ItemId, out: &mut Vec<&'a ItemId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.push(&node.id);
        for child in &node.children {
            self.walk_all(child, out);
        }
    }
}

//! Scriptable in-memory model for unit tests.

use ahash::AHashMap;
use sourcelist_core::{
    Capabilities, DragOperation, DragPayload, DropTarget, ItemId, SortDescriptor, SortValue,
    SourceModel,
};
use std::collections::HashSet;

/// One adapter write performed through the fixture.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Write {
    Name { id: ItemId, name: String },
    Index { id: ItemId, index: i64 },
    ItemDrop { ids: Vec<ItemId>, on: ItemId },
    IndexDrop { ids: Vec<ItemId>, parent: ItemId, index: usize },
    ExternalDrop { kind: String, target: DropTarget },
}

/// In-memory [`SourceModel`] with builder setup and a write log.
///
/// Defaults: every non-root is selectable, nothing is editable, no drag
/// support, no capabilities declared.
#[derive(Debug, Clone, Default)]
pub(crate) struct FixtureModel {
    pub roots: Vec<ItemId>,
    pub children: AHashMap<ItemId, Vec<ItemId>>,
    pub names: AHashMap<ItemId, String>,
    pub icons: AHashMap<ItemId, String>,
    pub indexes: AHashMap<ItemId, i64>,
    pub editable: HashSet<ItemId>,
    pub unselectable: HashSet<ItemId>,
    pub non_collapsible: HashSet<ItemId>,
    pub caps: Capabilities,
    pub internal_drag: bool,
    pub reordering: bool,
    pub descriptors: Vec<SortDescriptor>,
    pub sort_values: AHashMap<(ItemId, String), SortValue>,
    pub external_kinds: Vec<String>,
    pub rejected_names: HashSet<String>,
    pub refuse_drag: bool,
    pub refuse_commit: bool,
    /// Forced `validate_drop` answer for models declaring `VALIDATE_DROP`.
    pub drop_answer: Option<DragOperation>,
    pub writes: Vec<Write>,
}

impl FixtureModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, id: &str) -> Self {
        self.roots.push(ItemId::new(id));
        self.names.insert(ItemId::new(id), id.to_owned());
        self
    }

    pub fn with_child(mut self, parent: &str, id: &str) -> Self {
        self.children
            .entry(ItemId::new(parent))
            .or_default()
            .push(ItemId::new(id));
        self.names.insert(ItemId::new(id), id.to_owned());
        self
    }

    pub fn with_name(mut self, id: &str, name: &str) -> Self {
        self.names.insert(ItemId::new(id), name.to_owned());
        self
    }

    pub fn with_icon(mut self, id: &str, icon: &str) -> Self {
        self.icons.insert(ItemId::new(id), icon.to_owned());
        self
    }

    pub fn with_index(mut self, id: &str, index: i64) -> Self {
        self.indexes.insert(ItemId::new(id), index);
        self
    }

    pub fn with_editable(mut self, id: &str) -> Self {
        self.editable.insert(ItemId::new(id));
        self
    }

    pub fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    pub fn with_drag_enabled(mut self) -> Self {
        self.internal_drag = true;
        self
    }

    pub fn with_reordering(mut self) -> Self {
        self.internal_drag = true;
        self.reordering = true;
        self.caps |= Capabilities::ORDERING_INDEX;
        self
    }

    pub fn with_descriptor(mut self, descriptor: SortDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Child ids currently recorded under `parent`, as plain strings.
    pub fn child_names(&self, parent: &str) -> Vec<String> {
        self.children
            .get(parent)
            .map(|ids| ids.iter().map(|id| id.as_str().to_owned()).collect())
            .unwrap_or_default()
    }

    pub fn index_writes(&self) -> Vec<(String, i64)> {
        self.writes
            .iter()
            .filter_map(|w| match w {
                Write::Index { id, index } => Some((id.as_str().to_owned(), *index)),
                _ => None,
            })
            .collect()
    }

    fn detach(&mut self, id: &ItemId) {
        for siblings in self.children.values_mut() {
            siblings.retain(|sibling| sibling != id);
        }
        self.roots.retain(|root| root != id);
    }
}

impl SourceModel for FixtureModel {
    fn roots(&self) -> Vec<ItemId> {
        self.roots.clone()
    }

    fn is_root(&self, id: &ItemId) -> bool {
        self.roots.contains(id)
    }

    fn children_of(&self, id: &ItemId) -> Vec<ItemId> {
        self.children.get(id).cloned().unwrap_or_default()
    }

    fn display_name(&self, id: &ItemId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.as_str().to_owned())
    }

    fn set_display_name(&mut self, id: &ItemId, name: &str) {
        self.names.insert(id.clone(), name.to_owned());
        self.writes.push(Write::Name {
            id: id.clone(),
            name: name.to_owned(),
        });
    }

    fn is_selectable(&self, id: &ItemId) -> bool {
        !self.unselectable.contains(id)
    }

    fn icon(&self, id: &ItemId) -> Option<String> {
        self.icons.get(id).cloned()
    }

    fn is_collapsible(&self, id: &ItemId) -> bool {
        !self.non_collapsible.contains(id)
    }

    fn is_editable(&self, id: &ItemId) -> bool {
        self.editable.contains(id)
    }

    fn validate_name_change(&self, _id: &ItemId, proposed: &str) -> bool {
        !self.rejected_names.contains(proposed)
    }

    fn sort_descriptors(&self) -> Vec<SortDescriptor> {
        self.descriptors.clone()
    }

    fn sort_value(&self, id: &ItemId, field: &str) -> Option<SortValue> {
        self.sort_values.get(&(id.clone(), field.to_owned())).cloned()
    }

    fn ordering_index(&self, id: &ItemId) -> Option<i64> {
        self.indexes.get(id).copied()
    }

    fn set_ordering_index(&mut self, id: &ItemId, index: i64) {
        self.indexes.insert(id.clone(), index);
        self.writes.push(Write::Index {
            id: id.clone(),
            index,
        });
    }

    fn parent_of(&self, id: &ItemId) -> Option<ItemId> {
        for (parent, children) in &self.children {
            if children.contains(id) {
                return Some(parent.clone());
            }
        }
        None
    }

    fn supports_internal_drag(&self) -> bool {
        self.internal_drag
    }

    fn allows_reordering(&self) -> bool {
        self.reordering
    }

    fn allows_drag(&self, _ids: &[ItemId]) -> bool {
        !self.refuse_drag
    }

    fn validate_drop(&self, _ids: &[ItemId], _target: &DropTarget) -> DragOperation {
        self.drop_answer.unwrap_or(DragOperation::Move)
    }

    fn accept_item_drop(&mut self, ids: &[ItemId], on: &ItemId) -> bool {
        if self.refuse_commit {
            return false;
        }
        for id in ids {
            self.detach(id);
            self.children.entry(on.clone()).or_default().push(id.clone());
        }
        self.writes.push(Write::ItemDrop {
            ids: ids.to_vec(),
            on: on.clone(),
        });
        true
    }

    fn accept_index_drop(&mut self, ids: &[ItemId], parent: &ItemId, index: usize) -> bool {
        if self.refuse_commit {
            return false;
        }
        // Pre-removal index semantics, mirrored from the controller's default
        // policy so tests can compare both paths.
        let siblings = self.children.get(parent).cloned().unwrap_or_default();
        let clamped = index.min(siblings.len());
        let occupied = siblings[..clamped]
            .iter()
            .filter(|sibling| ids.contains(sibling))
            .count();
        for id in ids {
            self.detach(id);
        }
        let entry = self.children.entry(parent.clone()).or_default();
        let at = (clamped - occupied).min(entry.len());
        for (offset, id) in ids.iter().enumerate() {
            entry.insert(at + offset, id.clone());
        }
        self.writes.push(Write::IndexDrop {
            ids: ids.to_vec(),
            parent: parent.clone(),
            index,
        });
        true
    }

    fn accept_external_drop(&mut self, payload: &DragPayload, target: &DropTarget) -> bool {
        if self.refuse_commit {
            return false;
        }
        if let Some(anchor) = target.anchor() {
            let id = ItemId::new(payload.as_text().unwrap_or("external"));
            self.names.insert(id.clone(), id.as_str().to_owned());
            self.children.entry(anchor.clone()).or_default().push(id);
        }
        self.writes.push(Write::ExternalDrop {
            kind: payload.kind.clone(),
            target: target.clone(),
        });
        true
    }

    fn external_payload_kinds(&self) -> Vec<String> {
        self.external_kinds.clone()
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

/// Two-group sidebar used across the unit tests:
///
/// ```text
/// library          (root)
/// ├── inbox
/// └── archive
/// feeds            (root)
/// ├── news
/// │   ├── world
/// │   └── local
/// └── blogs
/// ```
pub(crate) fn sidebar() -> FixtureModel {
    FixtureModel::new()
        .with_root("library")
        .with_root("feeds")
        .with_child("library", "inbox")
        .with_child("library", "archive")
        .with_child("feeds", "news")
        .with_child("feeds", "blogs")
        .with_child("news", "world")
        .with_child("news", "local")
}

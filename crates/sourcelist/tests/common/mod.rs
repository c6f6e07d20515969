//! A small in-memory store shared by the integration tests.
//!
//! `StoreModel` keeps the whole hierarchy in hash maps and records every
//! write the controller hands it, so tests can assert both what ended up on
//! screen and what would have hit a real persistence layer.

#![allow(dead_code)]

use sourcelist_core::{Capabilities, DragPayload, DropTarget, ItemId, SourceModel};
use std::collections::{HashMap, HashSet};

/// One write the controller asked the store to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Name { id: ItemId, name: String },
    Index { id: ItemId, index: i64 },
    ItemDrop { ids: Vec<ItemId>, on: ItemId },
    IndexDrop { ids: Vec<ItemId>, parent: ItemId, index: usize },
    ExternalDrop { kind: String, target: DropTarget },
}

#[derive(Debug, Clone, Default)]
pub struct StoreModel {
    pub roots: Vec<ItemId>,
    pub children: HashMap<ItemId, Vec<ItemId>>,
    pub names: HashMap<ItemId, String>,
    pub indexes: HashMap<ItemId, i64>,
    pub editable: HashSet<ItemId>,
    pub rejected_names: HashSet<String>,
    pub caps: Capabilities,
    pub internal_drag: bool,
    pub reordering: bool,
    pub external_kinds: Vec<String>,
    pub writes: Vec<Write>,
}

impl StoreModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, id: &str) -> Self {
        self.roots.push(ItemId::new(id));
        self
    }

    pub fn with_child(mut self, parent: &str, id: &str) -> Self {
        self.children
            .entry(ItemId::new(parent))
            .or_default()
            .push(ItemId::new(id));
        self
    }

    pub fn with_name(mut self, id: &str, name: &str) -> Self {
        self.names.insert(ItemId::new(id), name.to_owned());
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

    pub fn with_reordering(mut self) -> Self {
        self.internal_drag = true;
        self.reordering = true;
        self.caps |= Capabilities::ORDERING_INDEX;
        self
    }

    pub fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    pub fn index_writes(&self) -> Vec<(String, i64)> {
        self.writes
            .iter()
            .filter_map(|write| match write {
                Write::Index { id, index } => Some((id.as_str().to_owned(), *index)),
                _ => None,
            })
            .collect()
    }

    fn detach(&mut self, id: &ItemId) {
        for children in self.children.values_mut() {
            children.retain(|child| child != id);
        }
        self.roots.retain(|root| root != id);
    }
}

impl SourceModel for StoreModel {
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
        !self.is_root(id)
    }

    fn is_editable(&self, id: &ItemId) -> bool {
        self.editable.contains(id)
    }

    fn validate_name_change(&self, _id: &ItemId, proposed: &str) -> bool {
        !self.rejected_names.contains(proposed)
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

    fn accept_item_drop(&mut self, ids: &[ItemId], on: &ItemId) -> bool {
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
        let existing = self.children.get(parent).cloned().unwrap_or_default();
        let clamped = index.min(existing.len());
        let occupied = existing[..clamped].iter().filter(|id| ids.contains(id)).count();
        for id in ids {
            self.detach(id);
        }
        let entry = self.children.entry(parent.clone()).or_default();
        let mut at = (clamped - occupied).min(entry.len());
        for id in ids {
            entry.insert(at, id.clone());
            at += 1;
        }
        self.writes.push(Write::IndexDrop {
            ids: ids.to_vec(),
            parent: parent.clone(),
            index,
        });
        true
    }

    fn accept_external_drop(&mut self, payload: &DragPayload, target: &DropTarget) -> bool {
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

/// The hierarchy most tests start from:
///
/// ```text
/// library            feeds
/// ├── inbox          ├── news
/// └── archive        │   ├── world
///                    │   └── local
///                    └── blogs
/// ```
pub fn sidebar() -> StoreModel {
    StoreModel::new()
        .with_root("library")
        .with_root("feeds")
        .with_child("library", "inbox")
        .with_child("library", "archive")
        .with_child("feeds", "news")
        .with_child("feeds", "blogs")
        .with_child("news", "world")
        .with_child("news", "local")
}

/// Names of the visible rows, top to bottom.
pub fn row_names<M: SourceModel>(list: &sourcelist::SourceList<M>) -> Vec<String> {
    list.rows().iter().map(|row| row.name.to_owned()).collect()
}

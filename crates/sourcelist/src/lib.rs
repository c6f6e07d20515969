#![forbid(unsafe_code)]

//! Headless controller for macOS-style source lists.
//!
//! # Role
//! `sourcelist` turns a host-implemented
//! [`SourceModel`](sourcelist_core::SourceModel) into the flat, ordered rows
//! a sidebar widget paints, and runs every stateful concern of such a
//! sidebar on the host's behalf: expand/collapse, selection, reacting to
//! store changes, drag-and-drop with persistent ordering, and inline rename
//! validation. It draws nothing and owns no widget; any UI layer that can
//! show rows and forward gestures can sit on top.
//!
//! # Primary responsibilities
//! - **SourceList**: the controller; one instance per sidebar.
//! - **TreeSnapshot**: the derived identifier-indexed tree, with sorted
//!   sibling groups and subtree-scoped rebuilds.
//! - **ChangeTracker**: maps kind-filtered change batches to the narrowest
//!   sufficient rebuild.
//! - **Selection**: row-set to item-set bridging with a settled,
//!   deduplicated change event.
//! - **Drag plumbing**: session capture, structural drop validation, and
//!   dense reindex planning.
//!
//! # How it fits in the system
//! The host implements `SourceModel` against `sourcelist-core`, hands it to
//! [`SourceList`], calls controller methods from its input handlers, and
//! drains [`SourceListEvent`](sourcelist_core::SourceListEvent)s after each
//! call. The controller is single-threaded and event-driven; it never calls
//! back into the host outside the model trait.
//!
//! # Example
//!
//! ```
//! use sourcelist::SourceList;
//! use sourcelist_core::{ItemId, SourceModel};
//!
//! struct Shelf;
//!
//! impl SourceModel for Shelf {
//!     fn roots(&self) -> Vec<ItemId> {
//!         vec![ItemId::new("library")]
//!     }
//!     fn is_root(&self, id: &ItemId) -> bool {
//!         id.as_str() == "library"
//!     }
//!     fn children_of(&self, id: &ItemId) -> Vec<ItemId> {
//!         if self.is_root(id) {
//!             vec![ItemId::new("inbox"), ItemId::new("archive")]
//!         } else {
//!             Vec::new()
//!         }
//!     }
//!     fn display_name(&self, id: &ItemId) -> String {
//!         id.as_str().to_owned()
//!     }
//!     fn set_display_name(&mut self, _id: &ItemId, _name: &str) {}
//!     fn is_selectable(&self, id: &ItemId) -> bool {
//!         !self.is_root(id)
//!     }
//! }
//!
//! let list = SourceList::new(Shelf).unwrap();
//! let names: Vec<&str> = list.rows().iter().map(|row| row.name).collect();
//! assert_eq!(names, ["library", "inbox", "archive"]);
//! ```

pub mod changes;
pub mod drag;
pub mod edit;
pub mod selection;
pub mod source_list;
#[cfg(feature = "state-persistence")]
pub mod state;
pub mod tree;

#[cfg(test)]
mod fixture;

pub use changes::ChangeTracker;
pub use drag::{DragOrigin, DragPhase, DragSession};
pub use edit::EditOutcome;
pub use selection::Selection;
pub use source_list::{Row, SourceList};
#[cfg(feature = "state-persistence")]
pub use state::SourceListState;
pub use tree::{TreeNode, TreeSnapshot};

pub use sourcelist_core as core;

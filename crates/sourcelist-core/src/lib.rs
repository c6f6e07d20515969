#![forbid(unsafe_code)]

//! Protocol layer for the sourcelist controller.
//!
//! # Role
//! `sourcelist-core` defines the contract between a host application and the
//! controller in the `sourcelist` crate: the [`SourceModel`] adapter trait the
//! host implements, the identifier and change-feed types flowing in, and the
//! event and error types flowing out.
//!
//! # Primary responsibilities
//! - **SourceModel**: the adapter trait with a small required core and
//!   defaulted optional callbacks.
//! - **Capabilities**: the probe telling the controller which optional
//!   callbacks the host genuinely implements.
//! - **ChangeBatch / EntityKind**: kind-tagged external mutation feed.
//! - **DragPayload / DropTarget / DragOperation**: drag-and-drop vocabulary.
//! - **SourceListEvent / SourceListError**: outbound events and failures.
//!
//! # How it fits in the system
//! Hosts that only implement an adapter depend on this crate alone. The
//! controller crate consumes these types and never defines protocol of its
//! own, so a model written against `sourcelist-core` is controller-agnostic.

pub mod adapter;
pub mod capability;
pub mod change;
pub mod error;
pub mod event;
pub mod id;
pub mod payload;
pub mod sort;

pub use adapter::{DragOperation, DropTarget, SourceModel};
pub use capability::Capabilities;
pub use change::{ChangeBatch, ChangedObject, EntityKind, RebuildScope};
pub use error::SourceListError;
pub use event::SourceListEvent;
pub use id::ItemId;
pub use payload::DragPayload;
pub use sort::{SortDescriptor, SortKey, SortValue};

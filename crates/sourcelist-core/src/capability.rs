//! Optional-callback probe flags.

use bitflags::bitflags;

bitflags! {
    /// Optional callbacks a [`SourceModel`](crate::adapter::SourceModel)
    /// genuinely implements.
    ///
    /// Every optional trait method has a default body, so all of them are
    /// callable on any model. The controller still needs to know which ones
    /// the host actually provides before relying on them: a default
    /// `accept_item_drop` that answers `false` is not the same as a host that
    /// performs the reparenting mutation. Hosts declare the callbacks they
    /// implement here; the controller consults the flags before delegating.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// No optional callbacks.
        const NONE           = 0b0000_0000;
        /// `validate_drop` answers are authoritative for drop legality.
        const VALIDATE_DROP  = 0b0000_0001;
        /// `accept_item_drop` performs the reparenting model mutation.
        const ITEM_DROP      = 0b0000_0010;
        /// `accept_index_drop` handles between-drops, ordering included.
        const INDEX_DROP     = 0b0000_0100;
        /// `accept_external_drop` handles payloads from outside the list.
        const EXTERNAL_DROP  = 0b0000_1000;
        /// `ordering_index` / `set_ordering_index` are backed by storage.
        const ORDERING_INDEX = 0b0001_0000;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::NONE
    }
}

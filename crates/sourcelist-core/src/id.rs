//! Stable item identifiers.

use std::borrow::Borrow;
use std::fmt;

/// Stable unique identifier for one item in a source list.
///
/// Assigned by the host. Required to be unique across the whole tree at any
/// point in time and stable across rebuilds; tree position is never part of
/// the identity, so an item keeps its identifier when it is reparented or
/// reordered.
///
/// # Example
///
/// ```
/// use sourcelist_core::ItemId;
///
/// let id = ItemId::new("inbox");
/// assert_eq!(id.as_str(), "inbox");
/// assert_eq!(id, ItemId::from("inbox"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(String);

impl ItemId {
    /// Create an identifier from a host-assigned key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Allows map lookups by `&str` without allocating an ItemId.
impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

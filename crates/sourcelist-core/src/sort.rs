//! Sibling-group sort criteria.
//!
//! A model may declare an ordered list of [`SortDescriptor`]s; the tree
//! builder applies them to every sibling group (roots included). Descriptors
//! earlier in the list take precedence; ties fall through to the next one.

use std::cmp::Ordering;

/// Field a sort descriptor orders by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// The item's display name, compared lexicographically.
    DisplayName,
    /// The adapter-persisted ordering index; items without one sort last.
    OrderingIndex,
    /// A host-defined field resolved through
    /// [`sort_value`](crate::adapter::SourceModel::sort_value).
    Field(String),
}

/// One sort criterion applied to every sibling group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDescriptor {
    /// Field to order by.
    pub key: SortKey,
    /// `true` for ascending order.
    pub ascending: bool,
}

impl SortDescriptor {
    /// Ascending order on `key`.
    #[must_use]
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            ascending: true,
        }
    }

    /// Descending order on `key`.
    #[must_use]
    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            ascending: false,
        }
    }
}

/// A comparable value produced by
/// [`sort_value`](crate::adapter::SourceModel::sort_value).
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Signed integer.
    Int(i64),
    /// Floating-point number, compared with total ordering.
    Float(f64),
    /// Text, compared lexicographically.
    Text(String),
    /// Boolean; `false` sorts before `true`.
    Bool(bool),
}

impl SortValue {
    /// Total ordering across all variants.
    ///
    /// Values of different variants order by variant (`Int`, `Float`, `Text`,
    /// `Bool`), so a model that mixes types in one field still sorts
    /// deterministically.
    #[must_use]
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Int(_) => 0,
            SortValue::Float(_) => 1,
            SortValue::Text(_) => 2,
            SortValue::Bool(_) => 3,
        }
    }
}

//! The asset store: an accumulating log of scanned services.

use crate::model::Asset;

/// Ordered, append-only collection of discovered services.
///
/// Assets carry no identifier and are never merged: two scans that see the
/// same service produce two entries. There is no mutation or deletion
/// operation; the inventory is a historical log, not a queryable live
/// state.
#[derive(Debug, Default)]
pub struct AssetStore {
    records: Vec<Asset>,
}

impl AssetStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append services verbatim, returning how many were added
    pub fn add_all(&mut self, items: Vec<Asset>) -> usize {
        let added = items.len();
        self.records.extend(items);
        added
    }

    /// Full ordered snapshot of current records
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Asset] {
        &self.records
    }

    /// Number of records held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the whole contents, used by mode switches
    pub(crate) fn replace_all(&mut self, records: Vec<Asset>) {
        self.records = records;
    }
}

//! The patch store and its two insertion orders.

use tracing::debug;

use crate::ident;
use crate::model::{Patch, PatchDraft};

/// Ordered collection of patch recommendations.
///
/// Identity is always generated here, never taken from a draft, so a
/// prioritize reply that happens to carry an `id` field cannot collide
/// with existing records. Manual creates prepend so the newest patch is
/// listed first; bulk inserts from the prioritization pipeline append in
/// reply order. The difference is intentional.
#[derive(Debug, Default)]
pub struct PatchStore {
    records: Vec<Patch>,
}

impl PatchStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a single record with a fresh id, prepending it
    pub fn create(&mut self, draft: PatchDraft) -> &Patch {
        let patch = Patch::from_draft(ident::fresh(), draft);
        self.records.insert(0, patch);
        &self.records[0]
    }

    /// Create one record per draft with fresh ids, appending in order.
    /// Returns how many were added.
    pub fn add_bulk(&mut self, drafts: Vec<PatchDraft>) -> usize {
        let added = drafts.len();
        self.records.extend(
            drafts
                .into_iter()
                .map(|draft| Patch::from_draft(ident::fresh(), draft)),
        );
        added
    }

    /// Replace the fields of the record with the given id.
    ///
    /// The id itself never changes. Returns whether a record was touched;
    /// an unknown id is silently a no-op.
    pub fn update(&mut self, id: &str, draft: PatchDraft) -> bool {
        match self.records.iter_mut().find(|patch| patch.id == id) {
            Some(patch) => {
                *patch = Patch::from_draft(id, draft);
                true
            }
            None => {
                debug!("Update for unknown patch {} ignored", id);
                false
            }
        }
    }

    /// Remove the record with the given id.
    ///
    /// Returns whether a record was removed; an unknown id is silently a
    /// no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|patch| patch.id != id);
        let removed = self.records.len() < before;
        if !removed {
            debug!("Removal of unknown patch {} ignored", id);
        }
        removed
    }

    /// Full ordered snapshot of current records
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Patch] {
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
    pub(crate) fn replace_all(&mut self, records: Vec<Patch>) {
        self.records = records;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn openssh_draft() -> PatchDraft {
        PatchDraft::new(
            "openssh",
            "8.2p1",
            "9.6p1",
            "addresses CVE-2023-48795",
            Severity::High,
        )
    }

    fn nginx_draft() -> PatchDraft {
        PatchDraft::new(
            "nginx",
            "1.18.0",
            "1.24.0",
            "rolls up worker hardening fixes",
            Severity::Medium,
        )
    }

    #[test]
    fn create_prepends_and_assigns_fresh_id() {
        let mut store = PatchStore::new();
        store.create(openssh_draft());
        let id = store.create(nginx_draft()).id.clone();

        assert_eq!(store.records()[0].id, id);
        assert_eq!(store.records()[0].service, "nginx");
        assert_eq!(store.records()[1].service, "openssh");
        assert!(!id.is_empty());
    }

    #[test]
    fn add_bulk_appends_in_reply_order() {
        let mut store = PatchStore::new();
        store.create(openssh_draft());
        let added = store.add_bulk(vec![nginx_draft(), openssh_draft()]);

        assert_eq!(added, 2);
        assert_eq!(store.records()[0].service, "openssh");
        assert_eq!(store.records()[1].service, "nginx");
        assert_eq!(store.records()[2].service, "openssh");
    }

    #[test]
    fn bulk_ids_are_fresh_and_unique() {
        let mut store = PatchStore::new();
        store.add_bulk(vec![openssh_draft(), nginx_draft()]);

        let ids: Vec<&str> = store.records().iter().map(|p| p.id.as_str()).collect();
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn update_replaces_fields_but_keeps_id() {
        let mut store = PatchStore::new();
        let id = store.create(openssh_draft()).id.clone();

        assert!(store.update(&id, nginx_draft()));
        assert_eq!(store.records()[0].id, id);
        assert_eq!(store.records()[0].service, "nginx");
    }

    #[test]
    fn update_on_unknown_id_is_a_noop() {
        let mut store = PatchStore::new();
        store.create(openssh_draft());
        let before = store.records().to_vec();

        assert!(!store.update("missing", nginx_draft()));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn remove_deletes_only_the_matching_record() {
        let mut store = PatchStore::new();
        let id = store.create(openssh_draft()).id.clone();
        store.create(nginx_draft());

        assert!(store.remove(&id));
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].service, "nginx");
    }

    #[test]
    fn remove_on_unknown_id_is_a_noop() {
        let mut store = PatchStore::new();
        store.create(openssh_draft());

        assert!(!store.remove("missing"));
        assert_eq!(store.len(), 1);
    }
}

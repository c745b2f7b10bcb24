//! The vulnerability store and its deduplication rule.

use tracing::debug;

use crate::ident;
use crate::model::{Status, Vulnerability, VulnerabilityDraft};
use crate::status;

/// Outcome of a bulk insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddReport {
    /// Records appended to the store
    pub added: usize,
    /// Drafts skipped because their id was already present
    pub duplicates: usize,
}

/// Ordered collection of vulnerability records.
///
/// Records are append-only: they are never deleted, and the only in-place
/// mutation is an explicit status transition. Ids are unique within the
/// store; [`VulnerabilityStore::add_all`] maintains that invariant by
/// skipping duplicates, which also makes re-ingestion of a feed that
/// carries its own ids idempotent.
#[derive(Debug, Default)]
pub struct VulnerabilityStore {
    records: Vec<Vulnerability>,
}

impl VulnerabilityStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append drafts, assigning identity and defaulting status.
    ///
    /// For each draft in order: a missing or empty id is replaced with a
    /// generated one, a missing status becomes [`Status::New`], and the
    /// record is appended unless its id already exists in the store or
    /// earlier in the same batch (first occurrence wins). Appending never
    /// fails; drafts without a recognized severity are stored as-is.
    pub fn add_all(&mut self, drafts: Vec<VulnerabilityDraft>) -> AddReport {
        let mut report = AddReport::default();
        for draft in drafts {
            let id = ident::ensure(draft.id);
            if self.contains(&id) {
                debug!("Skipping duplicate vulnerability {}", id);
                report.duplicates += 1;
                continue;
            }
            self.records.push(Vulnerability {
                id,
                severity: draft.severity,
                status: draft.status.unwrap_or_default(),
                extra: draft.extra,
            });
            report.added += 1;
        }
        report
    }

    /// Transition the status of the record with the given id.
    ///
    /// Returns whether a record was touched. An unknown id is silently a
    /// no-op; the caller only has eventually-consistent knowledge of the
    /// store contents.
    pub fn set_status(&mut self, id: &str, to: Status) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) if status::can_transition(record.status, to) => {
                record.status = to;
                true
            }
            Some(_) => false,
            None => {
                debug!("Status change to {} for unknown record {} ignored", to, id);
                false
            }
        }
    }

    /// Check whether a record with the given id exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    /// Full ordered snapshot of current records
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Vulnerability] {
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
    pub(crate) fn replace_all(&mut self, records: Vec<Vulnerability>) {
        self.records = records;
    }
}

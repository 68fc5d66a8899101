//! The canonical download set and the snapshot merger.
//!
//! Records are boxed so each one keeps a stable address for as long as its
//! uid stays in the backend's responses. Reconciliation mutates retained
//! records in place; only newly reported uids get fresh allocations.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::domain::Download;

use super::status::{StatusFlags, aggregate};

/// Summary of what a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Uids that entered the set.
    pub added: Vec<String>,
    /// Uids that left the set.
    pub removed: Vec<String>,
    /// Number of retained records whose fields changed.
    pub updated: usize,
}

impl MergeReport {
    /// True when the merge left the set untouched.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated == 0
    }
}

/// Identity-stable collection of downloads keyed by uid.
///
/// Iteration order is newest first (by `timestamp_start`) after every
/// reconciliation. Equality compares contents by uid, ignoring order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadSet {
    records: IndexMap<String, Box<Download>>,
}

impl DownloadSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a snapshot, as if merged into an empty set.
    pub fn from_snapshot(snapshot: &[Download]) -> Self {
        merge(Self::new(), snapshot)
    }

    /// Number of downloads.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a download by uid.
    pub fn get(&self, uid: &str) -> Option<&Download> {
        self.records.get(uid).map(AsRef::as_ref)
    }

    /// Whether a uid is present.
    pub fn contains(&self, uid: &str) -> bool {
        self.records.contains_key(uid)
    }

    /// Iterate downloads, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Download> {
        self.records.values().map(AsRef::as_ref)
    }

    /// Uids in iteration order.
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Owned copy of the downloads, newest first.
    pub fn to_vec(&self) -> Vec<Download> {
        self.iter().cloned().collect()
    }

    /// Derived pause/running flags.
    pub fn status(&self) -> StatusFlags {
        aggregate(self.iter())
    }

    /// Whether merging `snapshot` would leave the set unchanged.
    ///
    /// Structural and order-independent: record order and key order in the
    /// backend's payload never count as a difference.
    pub fn same_content(&self, snapshot: &[Download]) -> bool {
        let incoming = index_snapshot(snapshot);
        incoming.len() == self.records.len()
            && incoming.iter().all(|(uid, download)| {
                self.records
                    .get(*uid)
                    .is_some_and(|record| record.mirrors(download))
            })
    }

    /// Merge a freshly fetched snapshot into this set.
    ///
    /// 1. Prune records whose uid is absent from the snapshot.
    /// 2. Append snapshot records whose uid is not yet present.
    /// 3. Field-sync every record against its snapshot counterpart.
    ///
    /// If the snapshot repeats a uid, its last occurrence wins.
    pub fn reconcile(&mut self, snapshot: &[Download]) -> MergeReport {
        let incoming = index_snapshot(snapshot);
        let mut report = MergeReport::default();

        self.records.retain(|uid, _| {
            let keep = incoming.contains_key(uid.as_str());
            if !keep {
                report.removed.push(uid.clone());
            }
            keep
        });
        let retained = self.records.len();

        for uid in incoming.keys() {
            if !self.records.contains_key(*uid) {
                self.records
                    .insert((*uid).to_string(), Box::new(Download::new(*uid)));
                report.added.push((*uid).to_string());
            }
        }

        for (index, (uid, record)) in self.records.iter_mut().enumerate() {
            let Some(counterpart) = incoming.get(uid.as_str()) else {
                continue;
            };
            if record.sync_from(counterpart) && index < retained {
                report.updated += 1;
            }
        }

        self.records.sort_by(|_, a, _, b| newest_first(a, b));
        report
    }
}

/// Merge `new` into `old`, returning the canonical set.
///
/// Records present in both keep their allocation from `old`.
pub fn merge(mut old: DownloadSet, new: &[Download]) -> DownloadSet {
    old.reconcile(new);
    old
}

fn index_snapshot(snapshot: &[Download]) -> IndexMap<&str, &Download> {
    snapshot
        .iter()
        .map(|download| (download.uid.as_str(), download))
        .collect()
}

/// Descending by start time; records without a start time sort last.
fn newest_first(a: &Download, b: &Download) -> Ordering {
    match (a.timestamp_start, b.timestamp_start) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

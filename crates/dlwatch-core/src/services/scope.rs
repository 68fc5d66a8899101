//! The set of downloads a session tracks.

use std::sync::{Arc, PoisonError, RwLock};

/// Which downloads the poller asks the backend for.
///
/// Either every download the backend owns, or an explicit subset of uids.
/// Clones share the same subset, so a uid tracked through one clone (e.g.
/// by a restart) is picked up by the poller on its next fetch.
#[derive(Debug, Clone, Default)]
pub struct DownloadScope {
    subset: Option<Arc<RwLock<Vec<String>>>>,
}

impl DownloadScope {
    /// Track every download.
    pub fn all() -> Self {
        Self::default()
    }

    /// Track only the given uids.
    pub fn subset<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subset: Some(Arc::new(RwLock::new(
                uids.into_iter().map(Into::into).collect(),
            ))),
        }
    }

    /// Build from optional uids; an empty list means every download.
    pub fn from_uids(uids: Vec<String>) -> Self {
        if uids.is_empty() {
            Self::all()
        } else {
            Self::subset(uids)
        }
    }

    /// Whether this scope is an explicit subset.
    pub const fn is_subset(&self) -> bool {
        self.subset.is_some()
    }

    /// Uids to request, or `None` for all downloads.
    pub fn uids(&self) -> Option<Vec<String>> {
        self.subset
            .as_ref()
            .map(|subset| subset.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    /// Add a uid to the subset.
    ///
    /// Returns `true` if the uid was added; `false` for the all-downloads
    /// scope or when the uid is already tracked.
    pub fn track(&self, uid: impl Into<String>) -> bool {
        let Some(subset) = &self.subset else {
            return false;
        };
        let uid = uid.into();
        let mut uids = subset.write().unwrap_or_else(PoisonError::into_inner);
        if uids.contains(&uid) {
            return false;
        }
        uids.push(uid);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scope_ignores_tracking() {
        let scope = DownloadScope::all();
        assert!(!scope.track("x"));
        assert_eq!(scope.uids(), None);
    }

    #[test]
    fn test_subset_tracking_is_shared_between_clones() {
        let scope = DownloadScope::subset(["a"]);
        let clone = scope.clone();

        assert!(clone.track("b"));
        assert!(!clone.track("b"));
        assert_eq!(scope.uids(), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_from_uids_empty_means_all() {
        assert!(!DownloadScope::from_uids(Vec::new()).is_subset());
        assert!(DownloadScope::from_uids(vec!["a".to_string()]).is_subset());
    }
}

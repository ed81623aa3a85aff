//! Tracking of armed per-session watchers.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

/// A cancellation handle for one armed watcher.
#[derive(Debug)]
pub(crate) struct ArmedWatcher {
    /// Owner of the watched session.
    pub user_id: Uuid,
    /// Cancels the watcher task.
    pub cancel: watch::Sender<bool>,
}

/// Registry of armed watchers, keyed by session id.
///
/// Every scheduled auto-close is reachable from here, so no timer can leak:
/// a watcher is removed when it fires, when its session is closed for
/// another reason, or at shutdown.
#[derive(Debug, Clone, Default)]
pub struct GuardRegistry {
    inner: Arc<DashMap<Uuid, ArmedWatcher>>,
}

impl GuardRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a watcher for a session.
    pub(crate) fn insert(&self, session_id: Uuid, user_id: Uuid, cancel: watch::Sender<bool>) {
        // A replaced entry's sender drops here, which cancels the old task.
        self.inner
            .insert(session_id, ArmedWatcher { user_id, cancel });
    }

    /// Removes a completed watcher's own entry without signalling.
    pub(crate) fn remove_completed(&self, session_id: Uuid) {
        self.inner.remove(&session_id);
    }

    /// Cancels and removes the watcher for a session, if armed.
    pub fn disarm(&self, session_id: Uuid) -> bool {
        match self.inner.remove(&session_id) {
            Some((_, watcher)) => {
                let _ = watcher.cancel.send(true);
                true
            }
            None => false,
        }
    }

    /// Cancels and removes every watcher owned by a user.
    pub fn disarm_user(&self, user_id: Uuid) -> usize {
        let session_ids: Vec<Uuid> = self
            .inner
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| *entry.key())
            .collect();

        session_ids
            .into_iter()
            .filter(|id| self.disarm(*id))
            .count()
    }

    /// Cancels and removes every armed watcher (context teardown).
    pub fn disarm_all(&self) -> usize {
        let session_ids: Vec<Uuid> = self.inner.iter().map(|entry| *entry.key()).collect();
        session_ids
            .into_iter()
            .filter(|id| self.disarm(*id))
            .count()
    }

    /// Number of currently armed watchers.
    pub fn armed_count(&self) -> usize {
        self.inner.len()
    }
}

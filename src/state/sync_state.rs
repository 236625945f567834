// ============================================================================
// SYNC STATE - Session-scoped identity sync status
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

/// Where the identity sync stands for the current session
#[derive(Clone, Debug, PartialEq)]
pub enum SyncPhase {
    /// No sync attempted yet
    Idle,
    /// A sync-clerk request is in flight
    Syncing,
    /// The backend has acknowledged this identity
    Synced,
    /// The last attempt failed; retried on the next attempt, no backoff
    Failed(String),
}

/// Explicit sync state, one per session. `Synced` is terminal for the
/// session: once set, no further sync-clerk calls are issued.
#[derive(Clone)]
pub struct SyncState {
    phase: Rc<RefCell<SyncPhase>>,
}

impl SyncState {
    pub fn new() -> Self {
        Self {
            phase: Rc::new(RefCell::new(SyncPhase::Idle)),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase.borrow().clone()
    }

    pub fn is_synced(&self) -> bool {
        matches!(*self.phase.borrow(), SyncPhase::Synced)
    }

    /// True when a new sync attempt should be issued. In-flight and
    /// already-synced sessions must not start another request.
    pub fn should_attempt(&self) -> bool {
        matches!(*self.phase.borrow(), SyncPhase::Idle | SyncPhase::Failed(_))
    }

    pub fn begin(&self) {
        *self.phase.borrow_mut() = SyncPhase::Syncing;
    }

    pub fn mark_synced(&self) {
        *self.phase.borrow_mut() = SyncPhase::Synced;
    }

    pub fn mark_failed(&self, message: String) {
        *self.phase.borrow_mut() = SyncPhase::Failed(message);
    }

    /// New session (identity change, logout). Back to square one.
    pub fn reset(&self) {
        *self.phase.borrow_mut() = SyncPhase::Idle;
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_attempted_at_most_once_until_reset() {
        let sync = SyncState::new();
        assert!(sync.should_attempt());
        sync.begin();
        assert!(!sync.should_attempt());
        sync.mark_synced();
        assert!(!sync.should_attempt());
        assert!(sync.is_synced());
        sync.reset();
        assert!(sync.should_attempt());
    }

    #[test]
    fn failure_allows_retry() {
        let sync = SyncState::new();
        sync.begin();
        sync.mark_failed("HTTP 500".to_string());
        assert_eq!(sync.phase(), SyncPhase::Failed("HTTP 500".to_string()));
        assert!(sync.should_attempt());
        assert!(!sync.is_synced());
    }
}

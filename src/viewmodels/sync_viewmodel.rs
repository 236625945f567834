// ============================================================================
// SYNC VIEWMODEL - Identity sync business logic
// ============================================================================
// At most one sync-clerk call per session; a persisted marker lets page
// reloads within the session window skip the call entirely
// ============================================================================

use crate::models::SyncClerkRequest;
use crate::services::ApiClient;
use crate::state::AppState;
use crate::utils::storage::{load_from_storage, save_to_storage, sync_marker_key};

pub struct SyncViewModel {
    api_client: ApiClient,
}

impl SyncViewModel {
    pub fn new() -> Self {
        Self {
            api_client: ApiClient::new(),
        }
    }

    /// Read the persisted already-synced marker once at startup. Keyed by
    /// clerk id so another account on the same browser starts fresh.
    pub fn restore_marker(&self, state: &AppState) {
        let Some(clerk_id) = state.auth.clerk_id() else {
            return;
        };
        if load_from_storage::<bool>(&sync_marker_key(&clerk_id)).unwrap_or(false) {
            log::info!("🔐 Sync marker found for {}, skipping sync-clerk", clerk_id);
            state.sync.mark_synced();
        }
    }

    /// Push the signed-in identity to the backend unless this session has
    /// already synced or a request is in flight. Returns whether a call was
    /// actually made.
    pub async fn ensure_synced(&self, state: &AppState) -> Result<bool, String> {
        let Some(identity) = state.auth.get_identity() else {
            return Ok(false);
        };
        if !state.sync.should_attempt() {
            return Ok(false);
        }

        state.sync.begin();
        let request = SyncClerkRequest::from_identity(&identity);
        match self.api_client.sync_clerk(&request).await {
            Ok(response) => {
                state.sync.mark_synced();
                if response.created {
                    log::info!("✅ Student record created for {}", identity.clerk_id);
                } else {
                    log::info!("✅ Identity already known: {}", identity.clerk_id);
                }
                if let Some(student) = response.student {
                    state.auth.set_student(Some(student));
                }
                if let Err(e) = save_to_storage(&sync_marker_key(&identity.clerk_id), &true) {
                    log::warn!("⚠️ Could not persist sync marker: {}", e);
                }
                Ok(true)
            }
            Err(e) => {
                log::error!("❌ Identity sync failed: {}", e);
                state.sync.mark_failed(e.clone());
                Err(e)
            }
        }
    }
}

impl Default for SyncViewModel {
    fn default() -> Self {
        Self::new()
    }
}

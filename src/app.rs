// ============================================================================
// APP - Application shell (owns the root element and global state)
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{get_element_by_id, set_inner_html, append_child};
use crate::models::SyncIdentity;
use crate::state::{AppState, Role, StudentTab};
use crate::utils::storage::{load_from_storage, remove_from_storage, save_to_storage, IDENTITY_KEY};
use crate::viewmodels::{ParcelViewModel, ProfileViewModel, SupportViewModel, SyncViewModel};
use crate::views::render_app;

pub struct App {
    state: AppState,
    root: Option<Element>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();

        // Restore the identity from a previous page load, if any
        if let Some(identity) = load_from_storage::<SyncIdentity>(IDENTITY_KEY) {
            log::info!("💾 Identity restored from storage: {}", identity.clerk_id);
            apply_identity(&state, identity);
        }

        // Re-render whenever state changes; Timeout(0) batches bursts of
        // notifications into one render
        state.subscribe_to_changes(move || {
            use gloo_timers::callback::Timeout;
            Timeout::new(0, move || {
                crate::rerender_app();
            })
            .forget();
        });

        // The parcel cache is reactive on its own: a fresh fetch landing in
        // it triggers the same re-render path
        state.parcels.subscribe(move || {
            use gloo_timers::callback::Timeout;
            Timeout::new(0, move || {
                crate::rerender_app();
            })
            .forget();
        });

        let app = Self {
            state,
            root: Some(root),
        };
        if app.state.auth.is_signed_in() {
            bootstrap(&app.state);
        }
        Ok(app)
    }

    /// Full re-render: clear the root and rebuild the tree from state
    pub fn render(&mut self) -> Result<(), JsValue> {
        if let Some(root) = &self.root {
            set_inner_html(root, "");
            let app_view = render_app(&self.state)?;
            append_child(root, &app_view)?;
        }
        Ok(())
    }

    /// Identity pushed in by the external auth provider. `None` signs out.
    pub fn set_identity(&self, identity: Option<SyncIdentity>) {
        match identity {
            Some(identity) => {
                let changed_user = self.state.auth.clerk_id().as_deref()
                    != Some(identity.clerk_id.as_str());
                if changed_user {
                    // New session: sync state starts over for this user
                    self.state.sync.reset();
                    *self.state.student_tab.borrow_mut() = StudentTab::Pending;
                }
                if let Err(e) = save_to_storage(IDENTITY_KEY, &identity) {
                    log::warn!("⚠️ Could not persist identity: {}", e);
                }
                apply_identity(&self.state, identity);
                bootstrap(&self.state);
            }
            None => {
                log::info!("👋 Signed out");
                if let Err(e) = remove_from_storage(IDENTITY_KEY) {
                    log::warn!("⚠️ Could not clear stored identity: {}", e);
                }
                if self.state.scan.camera.is_active() {
                    crate::views::scanner::release_camera(&self.state);
                }
                self.state.auth.clear();
                self.state.sync.reset();
                self.state.parcels.update(|parcels| parcels.clear());
            }
        }
    }
}

fn apply_identity(state: &AppState, identity: SyncIdentity) {
    let role = Role::from_value(identity.role.as_deref().unwrap_or(""));
    state.auth.set_role(role);
    state.auth.set_identity(Some(identity));
    SyncViewModel::new().restore_marker(state);
}

/// Post-sign-in data load: sync the identity once, then fetch what the
/// active role needs. Every step reports failures through the banner and
/// keeps going; nothing here may take the page down.
fn bootstrap(state: &AppState) {
    let state = state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if !state.sync.is_synced() {
            let sync_vm = SyncViewModel::new();
            if let Err(e) = sync_vm.ensure_synced(&state).await {
                state.set_banner(Some(format!("Identity sync failed: {}", e)));
            }
        }

        let parcel_vm = ParcelViewModel::new();
        match state.auth.get_role() {
            Role::Guard => {
                if let Err(e) = parcel_vm.load_students(&state).await {
                    state.set_banner(Some(e));
                }
                if let Err(e) = parcel_vm.load_parcels(&state, true).await {
                    state.set_banner(Some(e));
                }
            }
            Role::Student => {
                if let Err(e) = ProfileViewModel::new().load(&state).await {
                    log::warn!("⚠️ Profile load failed: {}", e);
                }
                if let Err(e) = parcel_vm.load_parcels(&state, true).await {
                    state.set_banner(Some(e));
                }
                if let Some(email) = state
                    .auth
                    .get_student()
                    .map(|s| s.email)
                    .filter(|e| !e.is_empty())
                    .or_else(|| state.auth.get_identity().and_then(|i| i.email))
                {
                    if let Err(e) = SupportViewModel::new().load(&state, &email).await {
                        log::warn!("⚠️ Help request load failed: {}", e);
                    }
                }
            }
        }
        state.notify_subscribers();
    });
}

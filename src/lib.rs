// ============================================================================
// HOSTEL PARCEL MANAGER - FRONTEND MVVM (PURE RUST)
// ============================================================================
// Strict MVVM architecture:
// - Views: Functions that render DOM (no business logic)
// - ViewModels: UI logic over the services
// - Services: API communication only
// - State: State management with Rc<RefCell>
// - Models: Structures shared with the backend
// ============================================================================

mod app;
mod config;
mod dom;
mod models;
mod services;
mod state;
mod utils;
mod viewmodels;
mod views;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;
use crate::models::SyncIdentity;

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.enable_logging {
        wasm_logger::init(Config::default());
    }
    log::info!("🚀 Hostel Parcel Manager - Pure Rust + MVVM");

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Full re-render from current state
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(ref mut app) = *app_cell.borrow_mut() {
            if let Err(e) = app.render() {
                log::error!("❌ Re-render failed: {:?}", e);
            }
        } else {
            log::warn!("⚠️ App not initialized yet");
        }
    });
}

/// Entry point for the external identity provider. Pass the signed-in user
/// as `{clerk_id, first_name?, last_name?, email?, profile_image?, role?}`;
/// pass null/undefined to sign out.
#[wasm_bindgen]
pub fn set_identity(identity: JsValue) -> Result<(), JsValue> {
    let parsed: Option<SyncIdentity> = if identity.is_null() || identity.is_undefined() {
        None
    } else {
        let json = js_sys::JSON::stringify(&identity)?
            .as_string()
            .ok_or_else(|| JsValue::from_str("Identity is not serializable"))?;
        let identity = serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid identity payload: {}", e)))?;
        Some(identity)
    };

    APP.with(|app_cell| {
        if let Some(ref app) = *app_cell.borrow() {
            app.set_identity(parsed);
        } else {
            log::warn!("⚠️ set_identity called before the app started");
        }
    });
    rerender_app();
    Ok(())
}

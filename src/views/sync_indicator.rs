// ============================================================================
// SYNC INDICATOR VIEW - Identity sync status badge in the header
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::{AppState, SyncPhase};

pub fn render_sync_indicator(state: &AppState) -> Result<Element, JsValue> {
    let (class, label) = match state.sync.phase() {
        SyncPhase::Idle => ("sync-indicator idle", "Not synced".to_string()),
        SyncPhase::Syncing => ("sync-indicator syncing", "Syncing…".to_string()),
        SyncPhase::Synced => ("sync-indicator synced", "Synced".to_string()),
        SyncPhase::Failed(message) => {
            ("sync-indicator failed", format!("Sync failed: {}", message))
        }
    };

    Ok(ElementBuilder::new("span")?.class(class).text(&label).build())
}

// ============================================================================
// APP VIEW - Top-level layout and role switch
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::events::on_click;
use crate::dom::{append_child, ElementBuilder};
use crate::state::{AppState, Role};
use crate::views::guard_dashboard::render_guard_dashboard;
use crate::views::scanner::render_scanner;
use crate::views::student_dashboard::render_student_dashboard;
use crate::views::sync_indicator::render_sync_indicator;

pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let app = ElementBuilder::new("div")?.class("app").build();

    // Header
    let header = ElementBuilder::new("header")?.class("app-header").build();
    let title = ElementBuilder::new("h1")?.text("Hostel Parcel Manager").build();
    append_child(&header, &title)?;
    if state.auth.is_signed_in() {
        append_child(&header, &render_sync_indicator(state)?)?;
    }
    append_child(&app, &header)?;

    // Global error banner
    if let Some(message) = state.banner.borrow().clone() {
        let banner = ElementBuilder::new("div")?.class("app-banner").build();
        let text = ElementBuilder::new("span")?.text(&message).build();
        let dismiss = ElementBuilder::new("button")?
            .class("btn-dismiss")
            .text("✕")
            .build();
        {
            let state_clone = state.clone();
            on_click(&dismiss, move |_e| {
                state_clone.set_banner(None);
                state_clone.notify_subscribers();
            })?;
        }
        append_child(&banner, &text)?;
        append_child(&banner, &dismiss)?;
        append_child(&app, &banner)?;
    }

    if !state.auth.is_signed_in() {
        // Identity arrives from the external provider through set_identity
        let signed_out = ElementBuilder::new("div")?
            .class("signed-out")
            .text("Sign in to manage parcels")
            .build();
        append_child(&app, &signed_out)?;
        return Ok(app);
    }

    match state.auth.get_role() {
        Role::Guard => append_child(&app, &render_guard_dashboard(state)?)?,
        Role::Student => append_child(&app, &render_student_dashboard(state)?)?,
    }

    // Pickup scanner modal sits above whichever dashboard is active
    if state.scan.get_flow().is_open() {
        append_child(&app, &render_scanner(state)?)?;
    }

    Ok(app)
}

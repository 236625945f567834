// ============================================================================
// SCANNER VIEW - QR pickup modal (Scanning / Verifying / Result)
// ============================================================================
// The camera is a held resource: acquired when the scanning viewport mounts,
// released on decode, manual close and modal teardown. Release is idempotent
// so every exit path can call it unconditionally.
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::state::{AppState, ScanFlow};
use crate::utils::qr_ffi;
use crate::viewmodels::{ParcelViewModel, PickupViewModel};

const SCANNER_VIEWPORT_ID: &str = "qr-viewport";

/// Stop the widget and give the camera back. Safe to call on any path.
pub fn release_camera(state: &AppState) {
    if state.scan.camera.release() {
        qr_ffi::stop_qr_scanner();
        log::info!("📷 Camera released");
    }
}

fn close_scanner(state: &AppState) {
    release_camera(state);
    state.scan.set_flow(ScanFlow::Idle);
    state.notify_subscribers();
}

pub fn render_scanner(state: &AppState) -> Result<Element, JsValue> {
    let modal = ElementBuilder::new("div")?
        .id("scanner-modal")?
        .class("scanner-modal active")
        .build();

    // Overlay closes the modal
    let overlay = ElementBuilder::new("div")?.class("scanner-overlay").build();
    {
        let state_clone = state.clone();
        let closure = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
            close_scanner(&state_clone);
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        overlay.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    append_child(&modal, &overlay)?;

    let content = ElementBuilder::new("div")?.class("scanner-content").build();
    {
        let closure = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            e.stop_propagation();
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        content.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Header
    let header = ElementBuilder::new("div")?.class("scanner-header").build();
    let title = ElementBuilder::new("h2")?.text("Verify pickup").build();
    let close_btn = ElementBuilder::new("button")?
        .class("btn-close")
        .text("✕")
        .build();
    {
        let state_clone = state.clone();
        let closure = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
            close_scanner(&state_clone);
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        close_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    append_child(&header, &title)?;
    append_child(&header, &close_btn)?;
    append_child(&content, &header)?;

    match state.scan.get_flow() {
        ScanFlow::Idle => {}
        ScanFlow::Scanning => append_child(&content, &render_viewport(state)?)?,
        ScanFlow::Verifying => {
            let verifying = ElementBuilder::new("div")?
                .class("scanner-status")
                .text("Verifying code…")
                .build();
            append_child(&content, &verifying)?;
        }
        ScanFlow::Result(outcome) => {
            let class = if outcome.is_success() {
                "scanner-result success"
            } else {
                "scanner-result failure"
            };
            let result = ElementBuilder::new("div")?
                .class(class)
                .text(&outcome.user_message())
                .build();
            append_child(&content, &result)?;

            let retry = ElementBuilder::new("button")?
                .class("btn-secondary")
                .text("Scan again")
                .build();
            {
                let state_clone = state.clone();
                let closure = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    state_clone.scan.set_flow(ScanFlow::Scanning);
                    state_clone.notify_subscribers();
                }) as Box<dyn FnMut(web_sys::MouseEvent)>);
                retry.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
            append_child(&content, &retry)?;
        }
    }

    append_child(&modal, &content)?;
    Ok(modal)
}

/// Camera viewport. The widget is initialized after a short delay so the
/// container exists in the DOM when the JS glue looks it up.
fn render_viewport(state: &AppState) -> Result<Element, JsValue> {
    let viewport = ElementBuilder::new("div")?
        .attr("id", SCANNER_VIEWPORT_ID)?
        .class("scanner-viewport")
        .build();

    let state_decode = state.clone();
    let on_decoded = Closure::wrap(Box::new(move |token: JsValue| {
        let Some(token_str) = token.as_string() else {
            return;
        };
        // First decode only: later frames lose this gate until restart
        if !state_decode.scan.take_decode() {
            return;
        }
        log::info!("📱 QR decoded, verifying");
        release_camera(&state_decode);
        state_decode.notify_subscribers();

        let state = state_decode.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = PickupViewModel::new().verify(&token_str).await;
            let success = outcome.is_success();
            state.scan.set_flow(ScanFlow::Result(outcome));
            state.notify_subscribers();
            if success {
                // Backend state changed; the list must be refetched
                if let Err(e) = ParcelViewModel::new().load_parcels(&state, true).await {
                    state.set_banner(Some(e));
                    state.notify_subscribers();
                }
            }
        });
    }) as Box<dyn FnMut(JsValue)>);

    // Decode misses while no code is in frame are the normal case
    let on_error = Closure::wrap(Box::new(move |_error: JsValue| {}) as Box<dyn FnMut(JsValue)>);

    let state_init = state.clone();
    use gloo_timers::callback::Timeout;
    Timeout::new(100, move || {
        if state_init.scan.camera.acquire() {
            log::info!("📷 Camera acquired, starting QR widget");
        } else {
            // Re-render rebuilt the viewport; restart the widget on it
            qr_ffi::stop_qr_scanner();
        }
        qr_ffi::init_qr_scanner(
            SCANNER_VIEWPORT_ID,
            on_decoded.as_ref().unchecked_ref(),
            on_error.as_ref().unchecked_ref(),
        );
        on_decoded.forget();
        on_error.forget();
    })
    .forget();

    Ok(viewport)
}

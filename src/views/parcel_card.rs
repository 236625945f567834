// ============================================================================
// PARCEL CARD VIEW - One parcel, guard or student variant
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::models::{Parcel, ParcelStatus};
use crate::state::AppState;
use crate::utils::format::{format_optional_datetime, truncate};

/// Which actions the card offers
pub enum CardMode {
    /// Guard list: mark-picked-up button on pending parcels
    Guard,
    /// Student list: inline pickup QR on pending parcels
    Student,
}

pub fn render_parcel_card(
    state: &AppState,
    parcel: &Parcel,
    mode: CardMode,
    on_mark_picked_up: Rc<dyn Fn(u64)>,
) -> Result<Element, JsValue> {
    let status_class = match parcel.status {
        ParcelStatus::Pending => "parcel-card pending",
        ParcelStatus::PickedUp => "parcel-card picked-up",
    };
    let card = ElementBuilder::new("div")?
        .class(status_class)
        .attr("data-parcel-id", &parcel.id.to_string())?
        .build();

    // Header: recipient + status badge
    let header = ElementBuilder::new("div")?.class("parcel-header").build();
    let recipient = ElementBuilder::new("div")?
        .class("parcel-recipient")
        .text(&parcel.student_name)
        .build();
    let badge = ElementBuilder::new("span")?
        .class(&format!("status-badge {}", parcel.status.as_str().to_lowercase()))
        .text(parcel.status.label())
        .build();
    append_child(&header, &recipient)?;
    append_child(&header, &badge)?;
    append_child(&card, &header)?;

    // Body rows
    let body = ElementBuilder::new("div")?.class("parcel-body").build();

    let tracking = ElementBuilder::new("div")?
        .class("parcel-row")
        .text(&format!("📦 {}", parcel.tracking_id))
        .build();
    append_child(&body, &tracking)?;

    let courier = ElementBuilder::new("div")?
        .class("parcel-row")
        .text(&format!("🚚 {}", parcel.courier))
        .build();
    append_child(&body, &courier)?;

    if parcel.location.is_known() {
        let location = ElementBuilder::new("div")?
            .class("parcel-row")
            .text(&format!(
                "🏠 {} / Room {}",
                parcel.location.block, parcel.location.room
            ))
            .build();
        append_child(&body, &location)?;
    }

    if let Some(notes) = &parcel.location.notes {
        let notes_el = ElementBuilder::new("div")?
            .class("parcel-row parcel-notes")
            .text(&truncate(notes, 80))
            .build();
        append_child(&body, &notes_el)?;
    }

    let created = ElementBuilder::new("div")?
        .class("parcel-row parcel-timestamp")
        .text(&format!("Arrived: {}", format_optional_datetime(&parcel.created_at)))
        .build();
    append_child(&body, &created)?;

    if parcel.status == ParcelStatus::PickedUp {
        let picked = ElementBuilder::new("div")?
            .class("parcel-row parcel-timestamp")
            .text(&format!(
                "Picked up: {}",
                format_optional_datetime(&parcel.picked_up_time)
            ))
            .build();
        append_child(&body, &picked)?;
    }

    if let Some(image_url) = &parcel.image_url {
        let image = ElementBuilder::new("img")?
            .class("parcel-image")
            .attr("src", image_url)?
            .attr("alt", "Parcel photo")?
            .build();
        append_child(&body, &image)?;
    }

    append_child(&card, &body)?;

    match mode {
        CardMode::Guard => {
            if parcel.status.can_mark_picked_up() {
                let button = ElementBuilder::new("button")?
                    .class("btn-pickup")
                    .text("Mark picked up")
                    .build();
                let parcel_id = parcel.id;
                let closure = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    on_mark_picked_up(parcel_id);
                }) as Box<dyn FnMut(web_sys::MouseEvent)>);
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
                closure.forget();
                append_child(&card, &button)?;
            }
        }
        CardMode::Student => {
            if parcel.status == ParcelStatus::Pending {
                append_child(&card, &render_qr_section(state, parcel)?)?;
            }
        }
    }

    Ok(card)
}

/// Inline pickup QR: shown from the per-parcel cache once fetched, with a
/// link to the downloadable asset.
fn render_qr_section(state: &AppState, parcel: &Parcel) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("div")?.class("parcel-qr").build();

    match state.qr_images.borrow().get(&parcel.id) {
        Some(base64) => {
            let img = ElementBuilder::new("img")?
                .class("qr-image")
                .attr("src", &format!("data:image/png;base64,{}", base64))?
                .attr("alt", "Pickup QR code")?
                .build();
            append_child(&section, &img)?;

            let download = ElementBuilder::new("a")?
                .class("qr-download")
                .attr(
                    "href",
                    &crate::viewmodels::ParcelViewModel::new().qr_download_url(parcel.id),
                )?
                .attr("download", "")?
                .text("Download QR")
                .build();
            append_child(&section, &download)?;
        }
        None => {
            let loading = ElementBuilder::new("div")?
                .class("qr-loading")
                .text("Loading QR…")
                .build();
            append_child(&section, &loading)?;

            // Fetch once; the cache check inside load_qr_image deduplicates
            let state_clone = state.clone();
            let parcel_id = parcel.id;
            wasm_bindgen_futures::spawn_local(async move {
                let vm = crate::viewmodels::ParcelViewModel::new();
                match vm.load_qr_image(&state_clone, parcel_id).await {
                    Ok(()) => crate::rerender_app(),
                    Err(e) => log::error!("❌ Could not load QR for parcel {}: {}", parcel_id, e),
                }
            });
        }
    }

    Ok(section)
}

// ============================================================================
// STUDENT DASHBOARD VIEW - Profile / Pending / Picked Up / My Requests tabs
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::events::on_click;
use crate::dom::{append_child, ElementBuilder};
use crate::models::ParcelStatus;
use crate::state::{AppState, StudentTab};
use crate::views::help_requests::render_help_requests;
use crate::views::parcel_card::{render_parcel_card, CardMode};
use crate::views::profile::render_profile;

const TABS: [(StudentTab, &str); 4] = [
    (StudentTab::Profile, "Profile"),
    (StudentTab::Pending, "Pending"),
    (StudentTab::PickedUp, "Picked up"),
    (StudentTab::Requests, "My requests"),
];

pub fn render_student_dashboard(state: &AppState) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("student-dashboard").build();

    // Tab bar
    let tab_bar = ElementBuilder::new("div")?.class("tab-bar").build();
    let current = *state.student_tab.borrow();
    for (tab, label) in TABS {
        let class = if tab == current { "tab active" } else { "tab" };
        let button = ElementBuilder::new("button")?.class(class).text(label).build();
        let state_clone = state.clone();
        on_click(&button, move |_e| {
            *state_clone.student_tab.borrow_mut() = tab;
            state_clone.notify_subscribers();
        })?;
        append_child(&tab_bar, &button)?;
    }
    append_child(&container, &tab_bar)?;

    match current {
        StudentTab::Profile => append_child(&container, &render_profile(state)?)?,
        StudentTab::Pending => {
            append_child(&container, &render_parcel_tab(state, ParcelStatus::Pending)?)?
        }
        StudentTab::PickedUp => {
            append_child(&container, &render_parcel_tab(state, ParcelStatus::PickedUp)?)?
        }
        StudentTab::Requests => append_child(&container, &render_help_requests(state)?)?,
    }

    Ok(container)
}

fn render_parcel_tab(state: &AppState, status: ParcelStatus) -> Result<Element, JsValue> {
    let parcels = state.parcels.get();
    let parcels = parcels.borrow();
    let visible: Vec<_> = parcels.iter().filter(|p| p.status == status).collect();

    if *state.loading_parcels.borrow() && parcels.is_empty() {
        return Ok(ElementBuilder::new("div")?
            .class("list-loading")
            .text("Loading parcels…")
            .build());
    }
    if visible.is_empty() {
        let text = match status {
            ParcelStatus::Pending => "No parcels waiting for you",
            ParcelStatus::PickedUp => "Nothing picked up yet",
        };
        return Ok(ElementBuilder::new("div")?.class("empty-state").text(text).build());
    }

    let list = ElementBuilder::new("div")?.class("parcel-list").build();
    // Students never mark pickups themselves
    let noop: Rc<dyn Fn(u64)> = Rc::new(|_id| {});
    for parcel in visible {
        let card = render_parcel_card(state, parcel, CardMode::Student, noop.clone())?;
        append_child(&list, &card)?;
    }
    Ok(list)
}

// ============================================================================
// REGISTRATION FORM VIEW - Guard registers an arriving parcel
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::element::event_target_value;
use crate::dom::events::{on_change, on_click, on_input};
use crate::dom::{append_child, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::ParcelViewModel;

fn labeled_input(
    label: &str,
    input_type: &str,
    value: &str,
    placeholder: &str,
) -> Result<(Element, Element), JsValue> {
    let wrapper = ElementBuilder::new("div")?.class("form-field").build();
    let label_el = ElementBuilder::new("label")?.text(label).build();
    let input = ElementBuilder::new("input")?
        .class("form-input")
        .attr("type", input_type)?
        .attr("value", value)?
        .attr("placeholder", placeholder)?
        .build();
    append_child(&wrapper, &label_el)?;
    append_child(&wrapper, &input)?;
    Ok((wrapper, input))
}

pub fn render_registration_form(state: &AppState) -> Result<Element, JsValue> {
    let form = state.registration_form.borrow().clone();

    let container = ElementBuilder::new("div")?.class("registration-form").build();
    let title = ElementBuilder::new("h3")?.text("Register parcel").build();
    append_child(&container, &title)?;

    // Student dropdown from the backend roster
    let student_field = ElementBuilder::new("div")?.class("form-field").build();
    let student_label = ElementBuilder::new("label")?.text("Student").build();
    let select = ElementBuilder::new("select")?.class("form-input").build();

    let placeholder_opt = ElementBuilder::new("option")?
        .attr("value", "")?
        .text("Select a student")
        .build();
    append_child(&select, &placeholder_opt)?;
    for student in state.students.borrow().iter() {
        let option = ElementBuilder::new("option")?
            .attr("value", &student.id.to_string())?
            .text(&student.option_label())
            .build();
        if form.student_id == Some(student.id) {
            option.set_attribute("selected", "selected")?;
        }
        append_child(&select, &option)?;
    }
    {
        let state_clone = state.clone();
        on_change(&select, move |e| {
            let value = event_target_value(&e).unwrap_or_default();
            state_clone.registration_form.borrow_mut().student_id = value.parse::<u64>().ok();
        })?;
    }
    append_child(&student_field, &student_label)?;
    append_child(&student_field, &select)?;
    append_child(&container, &student_field)?;

    // Text inputs, bound to state so they survive re-renders
    let (block_field, block_input) =
        labeled_input("Hostel block", "text", &form.block, "e.g. A Block")?;
    {
        let state_clone = state.clone();
        on_input(&block_input, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.registration_form.borrow_mut().block = value;
            }
        })?;
    }
    append_child(&container, &block_field)?;

    let (room_field, room_input) = labeled_input("Room number", "text", &form.room, "e.g. 204")?;
    {
        let state_clone = state.clone();
        on_input(&room_input, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.registration_form.borrow_mut().room = value;
            }
        })?;
    }
    append_child(&container, &room_field)?;

    let (courier_field, courier_input) =
        labeled_input("Courier service", "text", &form.courier, "e.g. Delhivery")?;
    {
        let state_clone = state.clone();
        on_input(&courier_input, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.registration_form.borrow_mut().courier = value;
            }
        })?;
    }
    append_child(&container, &courier_field)?;

    let (notes_field, notes_input) =
        labeled_input("Notes (optional)", "text", &form.notes, "Fragile, heavy…")?;
    {
        let state_clone = state.clone();
        on_input(&notes_input, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.registration_form.borrow_mut().notes = value;
            }
        })?;
    }
    append_child(&container, &notes_field)?;

    let (image_field, image_input) =
        labeled_input("Image URL (optional)", "url", &form.image_url, "https://…")?;
    {
        let state_clone = state.clone();
        on_input(&image_input, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.registration_form.borrow_mut().image_url = value;
            }
        })?;
    }
    append_child(&container, &image_field)?;

    if let Some(error) = &form.error {
        let error_el = ElementBuilder::new("div")?
            .class("form-error")
            .text(error)
            .build();
        append_child(&container, &error_el)?;
    }
    if let Some(notice) = &form.mail_notice {
        let notice_el = ElementBuilder::new("div")?
            .class("form-notice")
            .text(notice)
            .build();
        append_child(&container, &notice_el)?;
    }

    let submit = ElementBuilder::new("button")?
        .class("btn-primary")
        .text(if form.submitting {
            "Registering…"
        } else {
            "Register parcel"
        })
        .build();
    if form.submitting {
        submit.set_attribute("disabled", "disabled")?;
    }
    {
        let state_clone = state.clone();
        on_click(&submit, move |_e| {
            let state = state_clone.clone();
            if state.registration_form.borrow().submitting {
                return;
            }
            {
                let mut form = state.registration_form.borrow_mut();
                form.submitting = true;
                form.error = None;
                form.mail_notice = None;
            }
            state.notify_subscribers();

            wasm_bindgen_futures::spawn_local(async move {
                let vm = ParcelViewModel::new();
                let form_snapshot = state.registration_form.borrow().clone();
                match vm.register(&state, &form_snapshot).await {
                    Ok(()) => {
                        // Keep the email notice the register call stored,
                        // clear the inputs themselves
                        let notice = state.registration_form.borrow().mail_notice.clone();
                        {
                            let mut form = state.registration_form.borrow_mut();
                            form.reset();
                            form.mail_notice = notice;
                        }
                        if let Err(e) = vm.load_parcels(&state, true).await {
                            state.set_banner(Some(e));
                        }
                    }
                    Err(e) => {
                        let mut form = state.registration_form.borrow_mut();
                        form.submitting = false;
                        form.error = Some(e);
                    }
                }
                state.notify_subscribers();
            });
        })?;
    }
    append_child(&container, &submit)?;

    Ok(container)
}

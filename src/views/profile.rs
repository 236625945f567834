// ============================================================================
// PROFILE VIEW - Student profile: view mode and field-level edit mode
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::element::event_target_value;
use crate::dom::events::{on_click, on_input};
use crate::dom::{append_child, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::profile_viewmodel::prefill_form;
use crate::viewmodels::ProfileViewModel;

pub fn render_profile(state: &AppState) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("profile").build();
    let editing = state.profile_form.borrow().editing;

    if editing {
        append_child(&container, &render_edit_form(state)?)?;
    } else {
        append_child(&container, &render_view_mode(state)?)?;
    }

    Ok(container)
}

fn render_view_mode(state: &AppState) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?.class("profile-card").build();

    match state.auth.get_student() {
        Some(student) => {
            if let Some(image) = &student.profile_image {
                let avatar = ElementBuilder::new("img")?
                    .class("profile-avatar")
                    .attr("src", image)?
                    .attr("alt", "Profile photo")?
                    .build();
                append_child(&card, &avatar)?;
            }
            for (label, value) in [
                ("Name", student.name.as_str()),
                ("Email", student.email.as_str()),
                ("Phone", student.phone.as_str()),
                ("Hostel block", student.hostel_block.as_str()),
                ("Room", student.room_number.as_str()),
            ] {
                let row = ElementBuilder::new("div")?.class("profile-row").build();
                let label_el = ElementBuilder::new("span")?
                    .class("profile-label")
                    .text(label)
                    .build();
                let value_el = ElementBuilder::new("span")?
                    .class("profile-value")
                    .text(if value.is_empty() { "-" } else { value })
                    .build();
                append_child(&row, &label_el)?;
                append_child(&row, &value_el)?;
                append_child(&card, &row)?;
            }
        }
        None => {
            let notice = ElementBuilder::new("div")?
                .class("profile-missing")
                .text("No profile yet. Complete it so guards can register your parcels.")
                .build();
            append_child(&card, &notice)?;
        }
    }

    let edit_btn = ElementBuilder::new("button")?
        .class("btn-primary")
        .text(if state.auth.get_student().is_some() {
            "Edit profile"
        } else {
            "Create profile"
        })
        .build();
    {
        let state_clone = state.clone();
        on_click(&edit_btn, move |_e| {
            let mut form = prefill_form(&state_clone);
            form.editing = true;
            *state_clone.profile_form.borrow_mut() = form;
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&card, &edit_btn)?;

    Ok(card)
}

fn render_edit_form(state: &AppState) -> Result<Element, JsValue> {
    let form = state.profile_form.borrow().clone();
    let container = ElementBuilder::new("div")?.class("profile-form").build();

    let fields: [(&str, &str, Box<dyn Fn(&AppState, String)>); 5] = [
        ("Name", form.name.as_str(), Box::new(|s, v| s.profile_form.borrow_mut().name = v)),
        ("Email", form.email.as_str(), Box::new(|s, v| s.profile_form.borrow_mut().email = v)),
        ("Phone", form.phone.as_str(), Box::new(|s, v| s.profile_form.borrow_mut().phone = v)),
        (
            "Hostel block",
            form.hostel_block.as_str(),
            Box::new(|s, v| s.profile_form.borrow_mut().hostel_block = v),
        ),
        (
            "Room number",
            form.room_number.as_str(),
            Box::new(|s, v| s.profile_form.borrow_mut().room_number = v),
        ),
    ];

    for (label, value, setter) in fields {
        let field = ElementBuilder::new("div")?.class("form-field").build();
        let label_el = ElementBuilder::new("label")?.text(label).build();
        let input = ElementBuilder::new("input")?
            .class("form-input")
            .attr("type", "text")?
            .attr("value", value)?
            .build();
        {
            let state_clone = state.clone();
            on_input(&input, move |e| {
                if let Some(value) = event_target_value(&e) {
                    setter(&state_clone, value);
                }
            })?;
        }
        append_child(&field, &label_el)?;
        append_child(&field, &input)?;
        append_child(&container, &field)?;
    }

    if let Some(error) = &form.error {
        let error_el = ElementBuilder::new("div")?
            .class("form-error")
            .text(error)
            .build();
        append_child(&container, &error_el)?;
    }

    let actions = ElementBuilder::new("div")?.class("form-actions").build();

    let save = ElementBuilder::new("button")?
        .class("btn-primary")
        .text(if form.saving { "Saving…" } else { "Save" })
        .build();
    if form.saving {
        save.set_attribute("disabled", "disabled")?;
    }
    {
        let state_clone = state.clone();
        on_click(&save, move |_e| {
            let state = state_clone.clone();
            if state.profile_form.borrow().saving {
                return;
            }
            {
                let mut form = state.profile_form.borrow_mut();
                form.saving = true;
                form.error = None;
            }
            state.notify_subscribers();

            wasm_bindgen_futures::spawn_local(async move {
                match ProfileViewModel::new().save(&state).await {
                    Ok(_student) => {
                        let mut form = state.profile_form.borrow_mut();
                        form.saving = false;
                        form.editing = false;
                    }
                    Err(e) => {
                        let mut form = state.profile_form.borrow_mut();
                        form.saving = false;
                        form.error = Some(e);
                    }
                }
                state.notify_subscribers();
            });
        })?;
    }
    append_child(&actions, &save)?;

    let cancel = ElementBuilder::new("button")?
        .class("btn-secondary")
        .text("Cancel")
        .build();
    {
        let state_clone = state.clone();
        on_click(&cancel, move |_e| {
            state_clone.profile_form.borrow_mut().editing = false;
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&actions, &cancel)?;
    append_child(&container, &actions)?;

    Ok(container)
}

// ============================================================================
// HELP REQUESTS VIEW - Ticket tabs, creation form, forward-only status
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::element::event_target_value;
use crate::dom::events::{on_change, on_click, on_input};
use crate::dom::{append_child, ElementBuilder};
use crate::models::{HelpRequest, HelpStatus};
use crate::state::AppState;
use crate::utils::format::format_optional_datetime;
use crate::viewmodels::SupportViewModel;

const ISSUE_TYPES: [&str; 4] = ["Damaged parcel", "Lost parcel", "Wrong parcel", "Other"];

fn student_email(state: &AppState) -> Option<String> {
    if let Some(student) = state.auth.get_student() {
        if !student.email.is_empty() {
            return Some(student.email);
        }
    }
    state.auth.get_identity().and_then(|i| i.email)
}

pub fn render_help_requests(state: &AppState) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("help-requests").build();

    append_child(&container, &render_help_form(state)?)?;
    append_child(&container, &render_status_tabs(state)?)?;

    let tab = *state.help_tab.borrow();
    let requests = state.help_requests.borrow();
    let visible = SupportViewModel::for_tab(&requests, tab);

    if visible.is_empty() {
        let empty = ElementBuilder::new("div")?
            .class("empty-state")
            .text(&format!("No {} requests", tab.label().to_lowercase()))
            .build();
        append_child(&container, &empty)?;
    } else {
        let list = ElementBuilder::new("div")?.class("request-list").build();
        for request in &visible {
            append_child(&list, &render_request_card(state, request)?)?;
        }
        append_child(&container, &list)?;
    }

    Ok(container)
}

fn render_status_tabs(state: &AppState) -> Result<Element, JsValue> {
    let tabs = ElementBuilder::new("div")?.class("status-tabs").build();
    let current = *state.help_tab.borrow();

    for status in HelpStatus::ALL {
        let class = if status == current {
            "tab active"
        } else {
            "tab"
        };
        let tab = ElementBuilder::new("button")?
            .class(class)
            .text(status.label())
            .build();
        let state_clone = state.clone();
        on_click(&tab, move |_e| {
            *state_clone.help_tab.borrow_mut() = status;
            state_clone.notify_subscribers();
        })?;
        append_child(&tabs, &tab)?;
    }

    Ok(tabs)
}

fn render_request_card(state: &AppState, request: &HelpRequest) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?
        .class(&format!("request-card {}", request.status.as_str()))
        .build();

    let tracking = ElementBuilder::new("div")?
        .class("request-tracking")
        .text(&format!("📦 {}", request.display_tracking()))
        .build();
    append_child(&card, &tracking)?;

    let issue = ElementBuilder::new("div")?
        .class("request-issue")
        .text(request.display_issue())
        .build();
    append_child(&card, &issue)?;

    let badge = ElementBuilder::new("span")?
        .class(&format!("status-badge {}", request.status.as_str()))
        .text(request.status.label())
        .build();
    append_child(&card, &badge)?;

    let raised = ElementBuilder::new("div")?
        .class("request-timestamp")
        .text(&format!(
            "Raised: {}",
            format_optional_datetime(&request.created_at_utc())
        ))
        .build();
    append_child(&card, &raised)?;

    // Forward-only: the button names the next step, resolved tickets get
    // the delete action instead
    if let Some(next) = request.status.next() {
        let advance = ElementBuilder::new("button")?
            .class("btn-advance")
            .text(&format!("Move to {}", next.label()))
            .build();
        let state_clone = state.clone();
        let request_clone = request.clone();
        on_click(&advance, move |_e| {
            let state = state_clone.clone();
            let request = request_clone.clone();
            let Some(email) = student_email(&state) else {
                state.set_banner(Some("No email on file".to_string()));
                state.notify_subscribers();
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = SupportViewModel::new().advance(&state, &request, &email).await {
                    log::error!("❌ Status update failed: {}", e);
                    state.set_banner(Some(e));
                }
                state.notify_subscribers();
            });
        })?;
        append_child(&card, &advance)?;
    } else if request.status.can_delete() {
        let delete = ElementBuilder::new("button")?
            .class("btn-delete")
            .text("Delete")
            .build();
        let state_clone = state.clone();
        let request_clone = request.clone();
        on_click(&delete, move |_e| {
            let state = state_clone.clone();
            let request = request_clone.clone();
            let Some(email) = student_email(&state) else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = SupportViewModel::new().delete(&state, &request, &email).await {
                    log::error!("❌ Delete failed: {}", e);
                    state.set_banner(Some(e));
                }
                state.notify_subscribers();
            });
        })?;
        append_child(&card, &delete)?;
    }

    Ok(card)
}

fn render_help_form(state: &AppState) -> Result<Element, JsValue> {
    let form = state.help_form.borrow().clone();

    let container = ElementBuilder::new("div")?.class("help-form").build();
    let title = ElementBuilder::new("h3")?.text("Raise a help request").build();
    append_child(&container, &title)?;

    let tracking = ElementBuilder::new("input")?
        .class("form-input")
        .attr("type", "text")?
        .attr("placeholder", "Tracking id")?
        .attr("value", &form.tracking_id)?
        .build();
    {
        let state_clone = state.clone();
        on_input(&tracking, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.help_form.borrow_mut().tracking_id = value;
            }
        })?;
    }
    append_child(&container, &tracking)?;

    let issue_select = ElementBuilder::new("select")?.class("form-input").build();
    let placeholder = ElementBuilder::new("option")?
        .attr("value", "")?
        .text("Issue type")
        .build();
    append_child(&issue_select, &placeholder)?;
    for issue in ISSUE_TYPES {
        let option = ElementBuilder::new("option")?
            .attr("value", issue)?
            .text(issue)
            .build();
        if form.issue_type == issue {
            option.set_attribute("selected", "selected")?;
        }
        append_child(&issue_select, &option)?;
    }
    {
        let state_clone = state.clone();
        on_change(&issue_select, move |e| {
            state_clone.help_form.borrow_mut().issue_type =
                event_target_value(&e).unwrap_or_default();
        })?;
    }
    append_child(&container, &issue_select)?;

    let message = ElementBuilder::new("textarea")?
        .class("form-input")
        .attr("placeholder", "Describe the problem (optional)")?
        .text(&form.message)
        .build();
    {
        let state_clone = state.clone();
        on_input(&message, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.help_form.borrow_mut().message = value;
            }
        })?;
    }
    append_child(&container, &message)?;

    if let Some(error) = &form.error {
        let error_el = ElementBuilder::new("div")?
            .class("form-error")
            .text(error)
            .build();
        append_child(&container, &error_el)?;
    }

    let submit = ElementBuilder::new("button")?
        .class("btn-primary")
        .text(if form.submitting { "Sending…" } else { "Submit" })
        .build();
    if form.submitting {
        submit.set_attribute("disabled", "disabled")?;
    }
    {
        let state_clone = state.clone();
        on_click(&submit, move |_e| {
            let state = state_clone.clone();
            if state.help_form.borrow().submitting {
                return;
            }
            let Some(email) = student_email(&state) else {
                state.help_form.borrow_mut().error = Some("No email on file".to_string());
                state.notify_subscribers();
                return;
            };
            {
                let mut form = state.help_form.borrow_mut();
                form.submitting = true;
                form.error = None;
            }
            state.notify_subscribers();

            wasm_bindgen_futures::spawn_local(async move {
                match SupportViewModel::new().create(&state, &email).await {
                    Ok(()) => {}
                    Err(e) => {
                        let mut form = state.help_form.borrow_mut();
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

// ============================================================================
// GUARD DASHBOARD VIEW - Stats, registration, filter panel and parcel list
// ============================================================================

use std::rc::Rc;

use chrono::Local;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::element::event_target_value;
use crate::dom::events::{on_change, on_click, on_input};
use crate::dom::{append_child, ElementBuilder};
use crate::models::{
    apply_view, filter_choices, DateRange, SortKey, SortOrder, StatusFilter, ViewQuery,
};
use crate::state::{AppState, ScanFlow};
use crate::viewmodels::parcel_viewmodel::compute_stats;
use crate::viewmodels::ParcelViewModel;
use crate::views::parcel_card::{render_parcel_card, CardMode};
use crate::views::registration_form::render_registration_form;

pub fn render_guard_dashboard(state: &AppState) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("guard-dashboard").build();

    let parcels = state.parcels.get();
    let parcels = parcels.borrow();

    append_child(&container, &render_stats(&parcels)?)?;
    append_child(&container, &render_registration_form(state)?)?;
    append_child(&container, &render_filter_panel(state, &parcels)?)?;

    // Scan entry point
    let scan_btn = ElementBuilder::new("button")?
        .class("btn-scan")
        .text("📷 Scan pickup QR")
        .build();
    {
        let state_clone = state.clone();
        on_click(&scan_btn, move |_e| {
            state_clone.scan.set_flow(ScanFlow::Scanning);
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&container, &scan_btn)?;

    // Derived view over the unfiltered cache
    let query = state.view_query.borrow().clone();
    let view = apply_view(&parcels, &query, Local::now());

    if *state.loading_parcels.borrow() && parcels.is_empty() {
        let loading = ElementBuilder::new("div")?
            .class("list-loading")
            .text("Loading parcels…")
            .build();
        append_child(&container, &loading)?;
    } else if view.is_empty() {
        let empty = ElementBuilder::new("div")?
            .class("empty-state")
            .text("No parcels match the current filters")
            .build();
        append_child(&container, &empty)?;
    } else {
        let list = ElementBuilder::new("div")?.class("parcel-list").build();
        let on_mark: Rc<dyn Fn(u64)> = {
            let state_clone = state.clone();
            Rc::new(move |parcel_id: u64| {
                let state = state_clone.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let vm = ParcelViewModel::new();
                    match vm.mark_picked_up(&state, parcel_id).await {
                        Ok(()) => state.set_banner(None),
                        Err(e) => {
                            log::error!("❌ Mark picked up failed: {}", e);
                            state.set_banner(Some(e));
                        }
                    }
                    state.notify_subscribers();
                });
            })
        };
        for parcel in &view {
            let card = render_parcel_card(state, parcel, CardMode::Guard, on_mark.clone())?;
            append_child(&list, &card)?;
        }
        append_child(&container, &list)?;
    }

    Ok(container)
}

fn render_stats(parcels: &[crate::models::Parcel]) -> Result<Element, JsValue> {
    let stats = compute_stats(parcels, Local::now());
    let row = ElementBuilder::new("div")?.class("stats-row").build();

    for (label, value) in [
        ("Total", stats.total),
        ("Pending", stats.pending),
        ("Picked up today", stats.picked_up_today),
    ] {
        let card = ElementBuilder::new("div")?.class("stat-card").build();
        let value_el = ElementBuilder::new("div")?
            .class("stat-value")
            .text(&value.to_string())
            .build();
        let label_el = ElementBuilder::new("div")?
            .class("stat-label")
            .text(label)
            .build();
        append_child(&card, &value_el)?;
        append_child(&card, &label_el)?;
        append_child(&row, &card)?;
    }

    Ok(row)
}

fn select_with_options(
    current: &str,
    options: &[(String, String)],
) -> Result<Element, JsValue> {
    let select = ElementBuilder::new("select")?.class("filter-select").build();
    for (value, label) in options {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .text(label)
            .build();
        if value == current {
            option.set_attribute("selected", "selected")?;
        }
        append_child(&select, &option)?;
    }
    Ok(select)
}

fn render_filter_panel(
    state: &AppState,
    parcels: &[crate::models::Parcel],
) -> Result<Element, JsValue> {
    let query = state.view_query.borrow().clone();
    let (blocks, couriers) = filter_choices(parcels);

    let panel = ElementBuilder::new("div")?.class("filter-panel").build();

    // Search box
    let search = ElementBuilder::new("input")?
        .class("filter-search")
        .attr("type", "search")?
        .attr("placeholder", "Search name, tracking id, room…")?
        .attr("value", &query.search)?
        .build();
    {
        let state_clone = state.clone();
        on_input(&search, move |e| {
            if let Some(value) = event_target_value(&e) {
                state_clone.view_query.borrow_mut().search = value;
                state_clone.notify_subscribers();
            }
        })?;
    }
    append_child(&panel, &search)?;

    // Status
    let status_options = vec![
        ("ALL".to_string(), "All statuses".to_string()),
        ("PENDING".to_string(), "Pending".to_string()),
        ("PICKED_UP".to_string(), "Picked up".to_string()),
    ];
    let status_select = select_with_options(query.status.as_value(), &status_options)?;
    {
        let state_clone = state.clone();
        on_change(&status_select, move |e| {
            let value = event_target_value(&e).unwrap_or_default();
            state_clone.view_query.borrow_mut().status = StatusFilter::from_value(&value);
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &status_select)?;

    // Block, derived from the data
    let mut block_options = vec![(String::new(), "All blocks".to_string())];
    block_options.extend(blocks.into_iter().map(|b| (b.clone(), b)));
    let block_select = select_with_options(&query.block, &block_options)?;
    {
        let state_clone = state.clone();
        on_change(&block_select, move |e| {
            state_clone.view_query.borrow_mut().block = event_target_value(&e).unwrap_or_default();
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &block_select)?;

    // Courier, derived from the data
    let mut courier_options = vec![(String::new(), "All couriers".to_string())];
    courier_options.extend(couriers.into_iter().map(|c| (c.clone(), c)));
    let courier_select = select_with_options(&query.courier, &courier_options)?;
    {
        let state_clone = state.clone();
        on_change(&courier_select, move |e| {
            state_clone.view_query.borrow_mut().courier =
                event_target_value(&e).unwrap_or_default();
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &courier_select)?;

    // Date range
    let date_options = vec![
        (String::new(), "All time".to_string()),
        ("today".to_string(), "Today".to_string()),
        ("week".to_string(), "Last 7 days".to_string()),
        ("month".to_string(), "Last 30 days".to_string()),
    ];
    let date_select = select_with_options(query.date_range.as_value(), &date_options)?;
    {
        let state_clone = state.clone();
        on_change(&date_select, move |e| {
            let value = event_target_value(&e).unwrap_or_default();
            state_clone.view_query.borrow_mut().date_range = DateRange::from_value(&value);
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &date_select)?;

    // Sort key and direction
    let sort_options = vec![
        ("createdAt".to_string(), "Arrival time".to_string()),
        ("studentName".to_string(), "Student name".to_string()),
        ("trackingId".to_string(), "Tracking id".to_string()),
        ("courier".to_string(), "Courier".to_string()),
        ("status".to_string(), "Status".to_string()),
    ];
    let sort_select = select_with_options(query.sort_by.as_value(), &sort_options)?;
    {
        let state_clone = state.clone();
        on_change(&sort_select, move |e| {
            let value = event_target_value(&e).unwrap_or_default();
            state_clone.view_query.borrow_mut().sort_by = SortKey::from_value(&value);
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &sort_select)?;

    let order_options = vec![
        ("desc".to_string(), "Newest first".to_string()),
        ("asc".to_string(), "Oldest first".to_string()),
    ];
    let order_select = select_with_options(query.sort_order.as_value(), &order_options)?;
    {
        let state_clone = state.clone();
        on_change(&order_select, move |e| {
            let value = event_target_value(&e).unwrap_or_default();
            state_clone.view_query.borrow_mut().sort_order = SortOrder::from_value(&value);
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &order_select)?;

    // Back to the default view (pending, newest first)
    let reset = ElementBuilder::new("button")?
        .class("btn-reset")
        .text("Reset filters")
        .build();
    {
        let state_clone = state.clone();
        on_click(&reset, move |_e| {
            *state_clone.view_query.borrow_mut() = ViewQuery::default();
            state_clone.notify_subscribers();
        })?;
    }
    append_child(&panel, &reset)?;

    Ok(panel)
}

//! Invoice editor: header fields plus the embedded line-item picker.
//!
//! A new invoice runs the picker in Local mode (selection lives in memory
//! until save); editing a persisted invoice runs it in Remote mode where
//! every add/remove is a provider call. A confirmed client change also
//! drops back to Local mode: the server still holds the old client until
//! save, so remote add calls would be rejected.

mod model;

use crate::domain::a001_client::api::fetch_clients;
use crate::shared::line_item_picker::LineItemPicker;
use contracts::domain::a001_client::aggregate::Client;
use contracts::domain::a004_invoice::aggregate::{InvoiceDto, InvoiceStatus};
use contracts::picker::{PickerMode, SelectionState};
use leptos::prelude::*;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn InvoiceDetails(
    id: Option<i64>,
    on_saved: Rc<dyn Fn(())>,
    on_cancel: Rc<dyn Fn(())>,
) -> impl IntoView {
    let invoice_id = RwSignal::new(id);
    let client_id = RwSignal::new(None::<i64>);
    // The client the server currently has for this invoice; diverges from
    // client_id between a confirmed client change and the save.
    let saved_client_id = RwSignal::new(None::<i64>);
    let state = RwSignal::new(SelectionState::new());

    let clients = RwSignal::new(Vec::<Client>::new());
    let invoice_number = RwSignal::new(String::new());
    let due_date = RwSignal::new(String::new());
    let discount = RwSignal::new(String::new());
    let tax_rate = RwSignal::new(String::new());
    let status = RwSignal::new(InvoiceStatus::Draft.as_str().to_string());
    let notes = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let mode = Signal::derive(move || match invoice_id.get() {
        Some(id) if client_id.get() == saved_client_id.get() => {
            PickerMode::Remote { invoice_id: id }
        }
        _ => PickerMode::Local,
    });

    spawn_local(async move {
        match fetch_clients().await {
            Ok(v) => clients.set(v),
            Err(e) => error.set(Some(format!("Failed to load clients: {}", e))),
        }
    });

    // Load an existing invoice: hydrate the picker before exposing the
    // owner, so the availability fetch keeps the attached selection.
    if let Some(existing_id) = id {
        spawn_local(async move {
            match model::fetch_by_id(existing_id).await {
                Ok(details) => {
                    let inv = details.invoice;
                    invoice_number.set(inv.invoice_number);
                    due_date.set(inv.due_date.unwrap_or_default());
                    discount.set(format!("{:.2}", inv.discount));
                    tax_rate.set(format!("{}", inv.tax_rate));
                    status.set(inv.status.as_str().to_string());
                    notes.set(inv.notes.unwrap_or_default());

                    let owner = inv.client_id.value();
                    state.update(|s| {
                        s.reset(Some(owner));
                        s.hydrate_selected(details.selected_items);
                    });
                    saved_client_id.set(Some(owner));
                    client_id.set(Some(owner));
                }
                Err(e) => error.set(Some(format!("Failed to load invoice: {}", e))),
            }
        });
    }

    // Changing the client clears the selection. On a persisted invoice
    // with chosen items that needs an explicit confirmation; declining
    // reverts the selector and leaves the state untouched.
    let handle_client_change = move |ev: leptos::ev::Event| {
        let raw = event_target_value(&ev);
        let new_owner = raw.parse::<i64>().ok();
        if new_owner == client_id.get_untracked() {
            return;
        }

        let persisted = invoice_id.get_untracked().is_some();
        let has_items = state.with_untracked(|s| !s.selected().is_empty());
        if persisted && has_items {
            let confirmed = web_sys::window()
                .map(|w| {
                    w.confirm_with_message(
                        "Changing the client removes all selected applications. Continue?",
                    )
                    .unwrap_or(false)
                })
                .unwrap_or(false);
            if !confirmed {
                if let Some(target) = ev.target() {
                    let select: web_sys::HtmlSelectElement = target.unchecked_into();
                    let current = client_id
                        .get_untracked()
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    select.set_value(&current);
                }
                return;
            }
        }
        client_id.set(new_owner);
    };

    let handle_save = {
        let on_saved = on_saved.clone();
        move |_| {
            let Some(owner) = client_id.get_untracked() else {
                error.set(Some("Select a client first".to_string()));
                return;
            };

            let dto = InvoiceDto {
                id: invoice_id.get_untracked().map(|v| v.to_string()),
                client_id: owner,
                due_date: Some(due_date.get_untracked()).filter(|s| !s.is_empty()),
                discount: discount.get_untracked().trim().parse::<f64>().ok(),
                tax_rate: tax_rate.get_untracked().trim().parse::<f64>().ok(),
                status: Some(status.get_untracked()),
                notes: Some(notes.get_untracked()).filter(|s| !s.is_empty()),
                items: state.with_untracked(|s| s.selected().to_vec()),
            };

            saving.set(true);
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match model::save_form(&dto).await {
                    Ok(()) => (on_saved)(()),
                    Err(e) => error.set(Some(e)),
                }
                saving.set(false);
            });
        }
    };

    // Live preview of the totals from the picker subtotal and form fields
    let total_preview = move || {
        let subtotal = state.with(|s| s.subtotal());
        let discount = discount.get().trim().parse::<f64>().unwrap_or(0.0);
        let rate = tax_rate.get().trim().parse::<f64>().unwrap_or(0.0);
        let after_discount = subtotal - discount;
        let tax = after_discount * rate / 100.0;
        format!("{:.2}", after_discount + tax)
    };

    view! {
        <div class="details-container invoice-details">
            <div class="details-header">
                <h3>
                    {move || {
                        if invoice_id.get().is_some() {
                            format!("Invoice {}", invoice_number.get())
                        } else {
                            "New invoice".to_string()
                        }
                    }}
                </h3>
            </div>

            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form">
                <div class="form-group">
                    <label for="client">"Client"</label>
                    <select id="client" on:change=handle_client_change>
                        <option value="" selected=move || client_id.get().is_none()>
                            "Select a client"
                        </option>
                        <For
                            each=move || clients.get()
                            key=|c| c.base.id.value()
                            children=move |c: Client| {
                                let cid = c.base.id.value();
                                let name = c.full_name();
                                view! {
                                    <option
                                        value=cid.to_string()
                                        selected=move || client_id.get() == Some(cid)
                                    >
                                        {name}
                                    </option>
                                }
                            }
                        />
                    </select>
                </div>

                <div class="form-group">
                    <label>"Applications"</label>
                    <LineItemPicker state=state client_id=client_id mode=mode />
                </div>

                <div class="form-row">
                    <div class="form-group">
                        <label for="due_date">"Due date"</label>
                        <input
                            type="date"
                            id="due_date"
                            prop:value=move || due_date.get()
                            on:input=move |ev| due_date.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="discount">"Discount"</label>
                        <input
                            type="text"
                            id="discount"
                            prop:value=move || discount.get()
                            on:input=move |ev| discount.set(event_target_value(&ev))
                            placeholder="0.00"
                        />
                    </div>
                    <div class="form-group">
                        <label for="tax_rate">"Tax rate, %"</label>
                        <input
                            type="text"
                            id="tax_rate"
                            prop:value=move || tax_rate.get()
                            on:input=move |ev| tax_rate.set(event_target_value(&ev))
                            placeholder="0"
                        />
                    </div>
                </div>

                <div class="form-group">
                    <label for="status">"Status"</label>
                    <select
                        id="status"
                        on:change=move |ev| status.set(event_target_value(&ev))
                    >
                        {InvoiceStatus::all()
                            .iter()
                            .map(|s| {
                                let value = s.as_str();
                                view! {
                                    <option
                                        value=value
                                        selected=move || status.get() == value
                                    >
                                        {s.label()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="form-group">
                    <label for="notes">"Notes"</label>
                    <textarea
                        id="notes"
                        prop:value=move || notes.get()
                        on:input=move |ev| notes.set(event_target_value(&ev))
                    ></textarea>
                </div>

                <div class="form-group totals">
                    <label>"Total"</label>
                    <input type="text" readonly prop:value=total_preview />
                </div>
            </div>

            <div class="details-actions">
                <button
                    class="button button--primary"
                    on:click=handle_save
                    disabled=move || saving.get()
                >
                    "Save"
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel(())>
                    "Cancel"
                </button>
            </div>
        </div>
    }
}

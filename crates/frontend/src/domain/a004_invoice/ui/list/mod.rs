use crate::domain::a001_client::api::fetch_clients;
use crate::domain::a004_invoice::ui::details::InvoiceDetails;
use crate::shared::api_utils::api_url;
use contracts::domain::a004_invoice::aggregate::{Invoice, InvoiceStatus};
use gloo_net::http::Request;
use leptos::prelude::*;
use std::collections::HashMap;
use std::rc::Rc;
use thaw::{Badge, BadgeAppearance, BadgeColor};
use wasm_bindgen_futures::spawn_local;

#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceRow {
    pub id: i64,
    pub number: String,
    pub client: String,
    pub date: String,
    pub status: InvoiceStatus,
    pub total: String,
    pub currency: String,
}

fn badge_color(status: InvoiceStatus) -> BadgeColor {
    match status {
        InvoiceStatus::Draft => BadgeColor::Informative,
        InvoiceStatus::Sent => BadgeColor::Brand,
        InvoiceStatus::Paid => BadgeColor::Success,
        InvoiceStatus::Overdue => BadgeColor::Danger,
        InvoiceStatus::Cancelled => BadgeColor::Subtle,
    }
}

#[component]
pub fn InvoiceList() -> impl IntoView {
    let (items, set_items) = signal(Vec::<InvoiceRow>::new());
    let (error, set_error) = signal(None::<String>);
    let (show_editor, set_show_editor) = signal(false);
    let (editing_id, set_editing_id) = signal(None::<i64>);

    let fetch = move || {
        spawn_local(async move {
            let clients = match fetch_clients().await {
                Ok(v) => v,
                Err(e) => {
                    set_error.set(Some(e));
                    return;
                }
            };
            let names: HashMap<i64, String> = clients
                .into_iter()
                .map(|c| (c.base.id.value(), c.full_name()))
                .collect();

            match fetch_invoices().await {
                Ok(v) => {
                    let rows = v
                        .into_iter()
                        .map(|inv| InvoiceRow {
                            id: inv.base.id.value(),
                            number: inv.invoice_number.clone(),
                            client: names
                                .get(&inv.client_id.value())
                                .cloned()
                                .unwrap_or_else(|| "-".to_string()),
                            date: inv.invoice_date.clone(),
                            status: inv.status,
                            total: format!("{:.2}", inv.total_amount),
                            currency: inv.currency.clone(),
                        })
                        .collect();
                    set_items.set(rows);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };
    fetch();

    let handle_delete = move |id: i64| {
        let confirmed = web_sys::window()
            .map(|w| w.confirm_with_message("Delete this invoice?").unwrap_or(false))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match delete_invoice(id).await {
                Ok(()) => fetch(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="list-container invoice-list">
            <div class="list-header">
                <h2>"Invoices"</h2>
                <button
                    class="button button--primary"
                    on:click=move |_| {
                        set_editing_id.set(None);
                        set_show_editor.set(true);
                    }
                >
                    "New invoice"
                </button>
            </div>

            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Number"</th>
                        <th>"Client"</th>
                        <th>"Date"</th>
                        <th>"Status"</th>
                        <th class="amount">"Total"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|row| row.id
                        children=move |row: InvoiceRow| {
                            let id = row.id;
                            view! {
                                <tr>
                                    <td>{row.number}</td>
                                    <td>{row.client}</td>
                                    <td>{row.date}</td>
                                    <td>
                                        <Badge
                                            appearance=BadgeAppearance::Tint
                                            color=badge_color(row.status)
                                        >
                                            {row.status.label()}
                                        </Badge>
                                    </td>
                                    <td class="amount">
                                        {format!("{} {}", row.currency, row.total)}
                                    </td>
                                    <td>
                                        <button
                                            class="button button--secondary"
                                            on:click=move |_| {
                                                set_editing_id.set(Some(id));
                                                set_show_editor.set(true);
                                            }
                                        >
                                            "Edit"
                                        </button>
                                        <button
                                            class="button button--danger"
                                            on:click=move |_| handle_delete(id)
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            {move || {
                show_editor
                    .get()
                    .then(|| {
                        let on_saved = Rc::new(move |_| {
                            set_show_editor.set(false);
                            fetch();
                        });
                        let on_cancel = Rc::new(move |_| set_show_editor.set(false));
                        view! {
                            <div class="modal-overlay">
                                <div class="modal-content">
                                    <InvoiceDetails
                                        id=editing_id.get()
                                        on_saved=on_saved
                                        on_cancel=on_cancel
                                    />
                                </div>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

async fn fetch_invoices() -> Result<Vec<Invoice>, String> {
    Request::get(&api_url("/api/a004/invoice"))
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json()
        .await
        .map_err(|e| e.to_string())
}

async fn delete_invoice(id: i64) -> Result<(), String> {
    let resp = Request::delete(&api_url(&format!("/api/a004/invoice/{}", id)))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if resp.ok() {
        Ok(())
    } else {
        Err(format!("Server returned {}", resp.status()))
    }
}

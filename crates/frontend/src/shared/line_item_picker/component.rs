use super::provider::{ProviderClient, ProviderError};
use contracts::picker::{LineItem, PickerError, PickerMode, SelectionState};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Error shown in the picker error region. Validation slips auto-dismiss;
/// provider failures stay until the next successful operation.
#[derive(Debug, Clone, PartialEq)]
struct PickerNotice {
    text: String,
    sticky: bool,
}

const AUTO_DISMISS_MS: u32 = 4000;

/// Line-item picker embedded in the invoice form.
///
/// The embedding form owns the [`SelectionState`] signal (it reads the
/// payload and subtotal at save time); the picker is the only writer.
/// In `Local` mode mutations stay in memory, in `Remote` mode every
/// add/remove goes to the provider and the server snapshot replaces the
/// selected list wholesale.
#[component]
pub fn LineItemPicker(
    state: RwSignal<SelectionState>,
    #[prop(into)] client_id: Signal<Option<i64>>,
    #[prop(into)] mode: Signal<PickerMode>,
) -> impl IntoView {
    let choice = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<PickerNotice>);
    let loading = RwSignal::new(false);
    // Token so only the latest auto-dismiss timer clears the notice
    let dismiss_seq = RwSignal::new(0u64);

    let show_transient = move |text: String| {
        let token = dismiss_seq.get_untracked() + 1;
        dismiss_seq.set(token);
        notice.set(Some(PickerNotice {
            text,
            sticky: false,
        }));
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(AUTO_DISMISS_MS).await;
            if dismiss_seq.get_untracked() == token {
                notice.update(|n| {
                    if n.as_ref().is_some_and(|n| !n.sticky) {
                        *n = None;
                    }
                });
            }
        });
    };

    let show_provider_error = move |e: ProviderError| {
        log::warn!("picker provider error: {}", e);
        notice.set(Some(PickerNotice {
            text: e.message,
            sticky: true,
        }));
    };

    // Refresh availability for the current owner. Responses carrying a
    // stale epoch (owner changed, fetch superseded) are discarded.
    let refresh = move |owner: i64| {
        let epoch = state
            .try_update(|s| {
                if s.owner() != Some(owner) {
                    s.reset(Some(owner));
                }
                s.begin_fetch()
            })
            .unwrap_or_default();
        let invoice_id = match mode.get_untracked() {
            PickerMode::Remote { invoice_id } => Some(invoice_id),
            PickerMode::Local => None,
        };

        loading.set(true);
        spawn_local(async move {
            match ProviderClient.fetch_available(owner, invoice_id).await {
                Ok(resp) => {
                    let applied = state
                        .try_update(|s| s.complete_fetch(epoch, resp.available_items))
                        .unwrap_or(false);
                    if applied {
                        notice.set(None);
                    }
                }
                Err(e) => {
                    // Degrade to an empty list; the widget stays usable
                    state.try_update(|s| s.complete_fetch(epoch, Vec::new()));
                    show_provider_error(e);
                }
            }
            loading.set(false);
        });
    };

    // Owner changes drive the whole lifecycle: clear, refetch, reset choice
    Effect::new(move |_| {
        match client_id.get() {
            Some(owner) => refresh(owner),
            None => state.update(|s| s.reset(None)),
        }
        choice.set(String::new());
    });

    let handle_add = move |_| {
        let raw = choice.get_untracked();
        if raw.is_empty() {
            show_transient(PickerError::EmptySelection.message().to_string());
            return;
        }
        let Ok(id) = raw.parse::<i64>() else {
            show_transient(PickerError::NotFound.message().to_string());
            return;
        };

        match mode.get_untracked() {
            PickerMode::Local => {
                let result = state
                    .try_update(|s| s.add(id))
                    .unwrap_or(Err(PickerError::NotFound));
                match result {
                    Ok(()) => {
                        choice.set(String::new());
                        notice.set(None);
                    }
                    Err(e) => show_transient(e.message().to_string()),
                }
            }
            PickerMode::Remote { invoice_id } => {
                spawn_local(async move {
                    match ProviderClient.add_item(invoice_id, id).await {
                        Ok(snap) => {
                            state.update(|s| s.replace_selected(snap.selected_items));
                            choice.set(String::new());
                            notice.set(None);
                        }
                        Err(e) => show_provider_error(e),
                    }
                });
            }
        }
    };

    let handle_remove = move |id: i64| match mode.get_untracked() {
        PickerMode::Local => {
            state.update(|s| s.remove(id));
            notice.set(None);
        }
        PickerMode::Remote { invoice_id } => {
            spawn_local(async move {
                match ProviderClient.remove_item(invoice_id, id).await {
                    Ok(snap) => {
                        state.update(|s| s.replace_selected(snap.selected_items));
                        notice.set(None);
                    }
                    Err(e) => show_provider_error(e),
                }
            });
        }
    };

    let add_disabled = move || choice.get().is_empty() || loading.get();

    view! {
        <div class="line-item-picker">
            {move || {
                notice
                    .get()
                    .map(|n| {
                        view! {
                            <div class=if n.sticky { "picker-error" } else { "picker-warning" }>
                                {n.text}
                            </div>
                        }
                    })
            }}

            <div class="picker-controls">
                <select
                    class="picker-select"
                    prop:value=move || choice.get()
                    on:change=move |ev| choice.set(event_target_value(&ev))
                    disabled=move || loading.get()
                >
                    <option value="">
                        {move || {
                            if loading.get() {
                                "Loading applications...".to_string()
                            } else if state.with(|s| s.available().is_empty()) {
                                "No applications available".to_string()
                            } else {
                                "Select an application".to_string()
                            }
                        }}
                    </option>
                    <For
                        each=move || state.with(|s| s.available().to_vec())
                        key=|item| item.id
                        children=move |item: LineItem| {
                            let text = if item.has_price() {
                                format!("{} ({} {})", item.label, item.currency.as_deref().unwrap_or(""), item.price_display())
                            } else {
                                format!("{} (no price)", item.label)
                            };
                            view! { <option value=item.id.to_string()>{text}</option> }
                        }
                    />
                </select>
                <button class="button button--primary" on:click=handle_add disabled=add_disabled>
                    "Add"
                </button>
            </div>

            {move || {
                if state.with(|s| s.selected().is_empty()) {
                    view! {
                        <div class="picker-empty">"No applications added to this invoice yet"</div>
                    }
                        .into_any()
                } else {
                    view! {
                        <table class="picker-table">
                            <thead>
                                <tr>
                                    <th>"Visa type"</th>
                                    <th>"Stage"</th>
                                    <th class="amount">"Price"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || state.with(|s| s.selected().to_vec())
                                    key=|item| item.id
                                    children=move |item: LineItem| {
                                        let (category, status) = item.label_parts();
                                        let (category, status) =
                                            (category.to_string(), status.to_string());
                                        let price = if item.has_price() {
                                            item.price_display()
                                        } else {
                                            "no price".to_string()
                                        };
                                        let id = item.id;
                                        view! {
                                            <tr>
                                                <td>{category}</td>
                                                <td>{status}</td>
                                                <td class="amount">{price}</td>
                                                <td>
                                                    <button
                                                        class="button button--danger"
                                                        on:click=move |_| handle_remove(id)
                                                    >
                                                        "Remove"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    }
                        .into_any()
                }
            }}

            <div class="picker-footer">
                <label>"Subtotal"</label>
                <input
                    type="text"
                    class="picker-subtotal"
                    readonly
                    prop:value=move || {
                        state.with(|s| format!("{} {}", s.currency(), s.subtotal_display()))
                    }
                />
            </div>

            // Form submission contract: serialized selection, always current
            <input
                type="hidden"
                name="selected_items"
                prop:value=move || state.with(|s| s.serialize())
            />
        </div>
    }
}

use crate::domain::a004_invoice::ui::list::InvoiceList;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="app-shell">
            <header class="app-header">
                <h1>"Visa Agency Admin"</h1>
            </header>
            <main class="app-main">
                <InvoiceList />
            </main>
        </div>
    }
}

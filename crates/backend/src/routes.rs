use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Client
        .route(
            "/api/a001/client",
            get(handlers::a001_client::list_all).post(handlers::a001_client::upsert),
        )
        .route(
            "/api/a001/client/:id",
            get(handlers::a001_client::get_by_id).delete(handlers::a001_client::delete),
        )
        // A002 Visa application
        .route(
            "/api/a002/visa-application",
            get(handlers::a002_visa_application::list_all)
                .post(handlers::a002_visa_application::upsert),
        )
        .route(
            "/api/a002/visa-application/by-client/:client_id",
            get(handlers::a002_visa_application::list_by_client),
        )
        .route(
            "/api/a002/visa-application/:id",
            get(handlers::a002_visa_application::get_by_id)
                .delete(handlers::a002_visa_application::delete),
        )
        // A003 Pricing
        .route(
            "/api/a003/pricing",
            get(handlers::a003_pricing::list_all).post(handlers::a003_pricing::upsert),
        )
        .route(
            "/api/a003/pricing/:id",
            get(handlers::a003_pricing::get_by_id).delete(handlers::a003_pricing::delete),
        )
        // A004 Invoice
        .route(
            "/api/a004/invoice",
            get(handlers::a004_invoice::list_all).post(handlers::a004_invoice::upsert),
        )
        // Picker provider: availability query plus the two selection writes
        .route(
            "/api/a004/invoice/available-items",
            get(handlers::a004_invoice::available_items),
        )
        .route(
            "/api/a004/invoice/:id",
            get(handlers::a004_invoice::get_by_id).delete(handlers::a004_invoice::delete),
        )
        .route(
            "/api/a004/invoice/:id/add-item",
            post(handlers::a004_invoice::add_item),
        )
        .route(
            "/api/a004/invoice/:id/remove-item",
            post(handlers::a004_invoice::remove_item),
        )
        // A005 Payment
        .route(
            "/api/a005/payment",
            get(handlers::a005_payment::list_all).post(handlers::a005_payment::upsert),
        )
        .route(
            "/api/a005/payment/by-client/:client_id",
            get(handlers::a005_payment::list_by_client),
        )
        .route(
            "/api/a005/payment/:id",
            get(handlers::a005_payment::get_by_id).delete(handlers::a005_payment::delete),
        )
}

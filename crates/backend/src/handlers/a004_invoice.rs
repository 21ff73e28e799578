use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a004_invoice;
use crate::shared::error::ServiceError;
use contracts::domain::a004_invoice::aggregate::{Invoice, InvoiceDetails, InvoiceDto};
use contracts::picker::{AddItemRequest, AvailableItemsResponse, SelectedItemsResponse};

/// GET /api/a004/invoice
pub async fn list_all() -> Result<Json<Vec<Invoice>>, ServiceError> {
    Ok(Json(a004_invoice::service::list_all().await?))
}

/// GET /api/a004/invoice/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<InvoiceDetails>, ServiceError> {
    let invoice = a004_invoice::service::get_by_id(id).await?;
    let selected_items = a004_invoice::service::selected_items(&invoice).await?;
    Ok(Json(InvoiceDetails {
        invoice,
        selected_items,
    }))
}

/// POST /api/a004/invoice
pub async fn upsert(Json(dto): Json<InvoiceDto>) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = if dto.id.is_some() {
        let id = dto.id.clone();
        a004_invoice::service::update(dto).await?;
        id.unwrap_or_default()
    } else {
        a004_invoice::service::create(dto).await?.to_string()
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/a004/invoice/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, ServiceError> {
    let deleted = a004_invoice::service::delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

#[derive(Debug, Deserialize)]
pub struct AvailableItemsQuery {
    pub client_id: i64,
    pub invoice_id: Option<i64>,
}

/// GET /api/a004/invoice/available-items?client_id=..[&invoice_id=..]
pub async fn available_items(
    Query(query): Query<AvailableItemsQuery>,
) -> Result<Json<AvailableItemsResponse>, ServiceError> {
    Ok(Json(
        a004_invoice::service::available_items(query.client_id, query.invoice_id).await?,
    ))
}

/// POST /api/a004/invoice/:id/add-item
pub async fn add_item(
    Path(id): Path<i64>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<SelectedItemsResponse>, ServiceError> {
    Ok(Json(
        a004_invoice::service::add_item(id, req.visa_application_id).await?,
    ))
}

/// POST /api/a004/invoice/:id/remove-item
pub async fn remove_item(
    Path(id): Path<i64>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<SelectedItemsResponse>, ServiceError> {
    Ok(Json(
        a004_invoice::service::remove_item(id, req.visa_application_id).await?,
    ))
}

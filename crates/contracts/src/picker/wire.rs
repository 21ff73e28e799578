use super::line_item::LineItem;
use serde::{Deserialize, Serialize};

/// `GET /api/a004/invoice/available-items` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableItemsResponse {
    pub client_id: i64,
    pub available_items: Vec<LineItem>,
}

/// Body of the add-item / remove-item provider writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub visa_application_id: i64,
}

/// Authoritative snapshot returned by the provider writes. Local picker
/// state is replaced with `selected_items` exactly; there is no client-side
/// merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedItemsResponse {
    pub selected_items: Vec<LineItem>,
    pub subtotal: f64,
    pub total: f64,
}

/// Error body shared by all provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

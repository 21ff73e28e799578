//! Network client for the picker provider endpoints.
//!
//! Everything returns [`ProviderError`] with a [`ProviderErrorKind`] from
//! the shared taxonomy; a response whose body cannot be decoded maps to
//! `Malformed` so the widget can degrade to an empty list instead of
//! crashing on bad data.

use crate::shared::api_utils::api_url;
use contracts::picker::{
    AddItemRequest, AvailableItemsResponse, ErrorResponse, ProviderErrorKind,
    SelectedItemsResponse,
};
use gloo_net::http::{Request, Response};

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    fn transport(e: gloo_net::Error) -> Self {
        Self {
            kind: ProviderErrorKind::ServerError,
            message: format!("Request failed: {}", e),
        }
    }

    fn malformed() -> Self {
        Self {
            kind: ProviderErrorKind::Malformed,
            message: "Unexpected response from server".to_string(),
        }
    }

    /// Status plus the server's `{ "error": ... }` body when present
    async fn from_response(resp: Response) -> Self {
        let kind = ProviderErrorKind::from_status(resp.status());
        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("Server returned {}", resp.status()),
        };
        Self { kind, message }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

/// Sole network channel of the picker widget
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderClient;

impl ProviderClient {
    /// GET /api/a004/invoice/available-items
    pub async fn fetch_available(
        &self,
        client_id: i64,
        invoice_id: Option<i64>,
    ) -> Result<AvailableItemsResponse, ProviderError> {
        let mut path = format!("/api/a004/invoice/available-items?client_id={}", client_id);
        if let Some(id) = invoice_id {
            path.push_str(&format!("&invoice_id={}", id));
        }

        let resp = Request::get(&api_url(&path))
            .send()
            .await
            .map_err(ProviderError::transport)?;
        if !resp.ok() {
            return Err(ProviderError::from_response(resp).await);
        }
        resp.json::<AvailableItemsResponse>()
            .await
            .map_err(|_| ProviderError::malformed())
    }

    /// POST /api/a004/invoice/:id/add-item
    pub async fn add_item(
        &self,
        invoice_id: i64,
        item_id: i64,
    ) -> Result<SelectedItemsResponse, ProviderError> {
        self.post_selection(invoice_id, item_id, "add-item").await
    }

    /// POST /api/a004/invoice/:id/remove-item
    pub async fn remove_item(
        &self,
        invoice_id: i64,
        item_id: i64,
    ) -> Result<SelectedItemsResponse, ProviderError> {
        self.post_selection(invoice_id, item_id, "remove-item").await
    }

    async fn post_selection(
        &self,
        invoice_id: i64,
        item_id: i64,
        action: &str,
    ) -> Result<SelectedItemsResponse, ProviderError> {
        let path = format!("/api/a004/invoice/{}/{}", invoice_id, action);
        let body = AddItemRequest {
            visa_application_id: item_id,
        };

        let resp = Request::post(&api_url(&path))
            .json(&body)
            .map_err(ProviderError::transport)?
            .send()
            .await
            .map_err(ProviderError::transport)?;
        if !resp.ok() {
            return Err(ProviderError::from_response(resp).await);
        }
        resp.json::<SelectedItemsResponse>()
            .await
            .map_err(|_| ProviderError::malformed())
    }
}

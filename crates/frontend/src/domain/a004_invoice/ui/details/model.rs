//! API functions for the invoice editor

use crate::shared::api_utils::api_url;
use contracts::domain::a004_invoice::aggregate::{InvoiceDetails, InvoiceDto};
use contracts::picker::ErrorResponse;
use gloo_net::http::Request;

pub async fn fetch_by_id(id: i64) -> Result<InvoiceDetails, String> {
    Request::get(&api_url(&format!("/api/a004/invoice/{}", id)))
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json()
        .await
        .map_err(|e| e.to_string())
}

pub async fn save_form(dto: &InvoiceDto) -> Result<(), String> {
    let resp = Request::post(&api_url("/api/a004/invoice"))
        .json(dto)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if resp.ok() {
        Ok(())
    } else {
        match resp.json::<ErrorResponse>().await {
            Ok(body) => Err(body.error),
            Err(_) => Err(format!("Server returned {}", resp.status())),
        }
    }
}

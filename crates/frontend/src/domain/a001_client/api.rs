//! Client fetch helpers for the invoice editor's owner selector

use crate::shared::api_utils::api_url;
use contracts::domain::a001_client::aggregate::Client;
use gloo_net::http::Request;

pub async fn fetch_clients() -> Result<Vec<Client>, String> {
    Request::get(&api_url("/api/a001/client"))
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json()
        .await
        .map_err(|e| e.to_string())
}

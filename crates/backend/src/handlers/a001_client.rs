use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a001_client;
use crate::shared::error::ServiceError;
use contracts::domain::a001_client::aggregate::{Client, ClientDto};

/// GET /api/a001/client
pub async fn list_all() -> Result<Json<Vec<Client>>, ServiceError> {
    Ok(Json(a001_client::service::list_all().await?))
}

/// GET /api/a001/client/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Client>, ServiceError> {
    Ok(Json(a001_client::service::get_by_id(id).await?))
}

/// POST /api/a001/client
pub async fn upsert(Json(dto): Json<ClientDto>) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = if dto.id.is_some() {
        let id = dto.id.clone();
        a001_client::service::update(dto).await?;
        id.unwrap_or_default()
    } else {
        a001_client::service::create(dto).await?.to_string()
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/a001/client/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, ServiceError> {
    let deleted = a001_client::service::delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

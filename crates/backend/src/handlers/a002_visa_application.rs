use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a002_visa_application;
use crate::shared::error::ServiceError;
use contracts::domain::a002_visa_application::aggregate::{VisaApplication, VisaApplicationDto};

/// GET /api/a002/visa-application
pub async fn list_all() -> Result<Json<Vec<VisaApplication>>, ServiceError> {
    Ok(Json(a002_visa_application::service::list_all().await?))
}

/// GET /api/a002/visa-application/by-client/:client_id
pub async fn list_by_client(
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<VisaApplication>>, ServiceError> {
    Ok(Json(
        a002_visa_application::service::list_by_client(client_id).await?,
    ))
}

/// GET /api/a002/visa-application/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<VisaApplication>, ServiceError> {
    Ok(Json(a002_visa_application::service::get_by_id(id).await?))
}

/// POST /api/a002/visa-application
pub async fn upsert(
    Json(dto): Json<VisaApplicationDto>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = if dto.id.is_some() {
        let id = dto.id.clone();
        a002_visa_application::service::update(dto).await?;
        id.unwrap_or_default()
    } else {
        a002_visa_application::service::create(dto).await?.to_string()
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/a002/visa-application/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, ServiceError> {
    let deleted = a002_visa_application::service::delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

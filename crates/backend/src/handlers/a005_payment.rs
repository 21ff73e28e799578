use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a005_payment;
use crate::shared::error::ServiceError;
use contracts::domain::a005_payment::aggregate::{Payment, PaymentDto};

/// GET /api/a005/payment
pub async fn list_all() -> Result<Json<Vec<Payment>>, ServiceError> {
    Ok(Json(a005_payment::service::list_all().await?))
}

/// GET /api/a005/payment/by-client/:client_id
pub async fn list_by_client(
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<Payment>>, ServiceError> {
    Ok(Json(a005_payment::service::list_by_client(client_id).await?))
}

/// GET /api/a005/payment/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Payment>, ServiceError> {
    Ok(Json(a005_payment::service::get_by_id(id).await?))
}

/// POST /api/a005/payment
pub async fn upsert(Json(dto): Json<PaymentDto>) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = if dto.id.is_some() {
        let id = dto.id.clone();
        a005_payment::service::update(dto).await?;
        id.unwrap_or_default()
    } else {
        a005_payment::service::create(dto).await?.to_string()
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/a005/payment/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, ServiceError> {
    let deleted = a005_payment::service::delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

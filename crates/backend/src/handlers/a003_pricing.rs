use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a003_pricing;
use crate::shared::error::ServiceError;
use contracts::domain::a003_pricing::aggregate::{Pricing, PricingDto};

/// GET /api/a003/pricing
pub async fn list_all() -> Result<Json<Vec<Pricing>>, ServiceError> {
    Ok(Json(a003_pricing::service::list_all().await?))
}

/// GET /api/a003/pricing/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Pricing>, ServiceError> {
    Ok(Json(a003_pricing::service::get_by_id(id).await?))
}

/// POST /api/a003/pricing
pub async fn upsert(Json(dto): Json<PricingDto>) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = if dto.id.is_some() {
        let id = dto.id.clone();
        a003_pricing::service::update(dto).await?;
        id.unwrap_or_default()
    } else {
        a003_pricing::service::create(dto).await?.to_string()
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/a003/pricing/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, ServiceError> {
    let deleted = a003_pricing::service::delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

use super::repository;
use crate::shared::error::ServiceError;
use contracts::domain::a001_client::aggregate::VisaType;
use contracts::domain::a003_pricing::aggregate::{Pricing, PricingDto, PricingId, DEFAULT_CURRENCY};
use contracts::domain::common::BaseAggregate;

pub async fn get_by_id(id: i64) -> Result<Pricing, ServiceError> {
    repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Pricing"))
}

pub async fn list_all() -> Result<Vec<Pricing>, ServiceError> {
    Ok(repository::list_all().await?)
}

/// Current price and currency for a visa type.
/// Falls back to the built-in defaults when no active pricing row exists.
pub async fn price_for_visa_type(visa_type: VisaType) -> Result<(f64, String), ServiceError> {
    match repository::get_active_for_visa_type(visa_type).await? {
        Some(pricing) => Ok((pricing.amount, pricing.currency)),
        None => Ok((
            Pricing::default_amount(visa_type),
            DEFAULT_CURRENCY.to_string(),
        )),
    }
}

pub async fn create(dto: PricingDto) -> Result<i64, ServiceError> {
    let visa_type = VisaType::from_str(&dto.visa_type)
        .ok_or_else(|| ServiceError::Validation(format!("Unknown visa type '{}'", dto.visa_type)))?;
    if dto.amount < 0.0 {
        return Err(ServiceError::Validation(
            "Amount must not be negative".to_string(),
        ));
    }
    // One pricing row per visa type
    if repository::get_active_for_visa_type(visa_type).await?.is_some() {
        return Err(ServiceError::Validation(format!(
            "Active pricing for {} already exists",
            visa_type.label()
        )));
    }

    let pricing = Pricing {
        base: BaseAggregate::new(
            PricingId::new(0),
            format!("PRC-{}", visa_type.as_str().to_uppercase()),
            format!("{} visa fee", visa_type.label()),
        ),
        visa_type,
        amount: dto.amount,
        currency: dto.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        is_active: dto.is_active.unwrap_or(true),
    };

    Ok(repository::insert(&pricing).await?)
}

pub async fn update(dto: PricingDto) -> Result<(), ServiceError> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ServiceError::Validation("Invalid pricing id".to_string()))?;
    if dto.amount < 0.0 {
        return Err(ServiceError::Validation(
            "Amount must not be negative".to_string(),
        ));
    }

    let mut pricing = get_by_id(id).await?;
    pricing.amount = dto.amount;
    if let Some(currency) = dto.currency {
        pricing.currency = currency;
    }
    if let Some(active) = dto.is_active {
        pricing.is_active = active;
    }
    pricing.base.touch();

    Ok(repository::update(&pricing).await?)
}

pub async fn delete(id: i64) -> Result<bool, ServiceError> {
    Ok(repository::soft_delete(id).await?)
}

use super::repository;
use crate::domain::{a001_client, a002_visa_application};
use crate::shared::error::ServiceError;
use contracts::domain::a001_client::aggregate::ClientId;
use contracts::domain::a002_visa_application::aggregate::VisaApplicationId;
use contracts::domain::a003_pricing::aggregate::DEFAULT_CURRENCY;
use contracts::domain::a005_payment::aggregate::{
    DiscountType, Payment, PaymentDto, PaymentId, PaymentMethod, PaymentStatus,
};
use contracts::domain::common::BaseAggregate;

pub async fn get_by_id(id: i64) -> Result<Payment, ServiceError> {
    repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Payment"))
}

pub async fn list_all() -> Result<Vec<Payment>, ServiceError> {
    Ok(repository::list_all().await?)
}

pub async fn list_by_client(client_id: i64) -> Result<Vec<Payment>, ServiceError> {
    Ok(repository::list_by_client(client_id).await?)
}

pub async fn create(dto: PaymentDto) -> Result<i64, ServiceError> {
    let client = a001_client::service::get_by_id(dto.client_id).await?;
    let visa_application_id = resolve_application(&dto).await?;
    validate_amounts(&dto)?;

    let mut payment = Payment {
        base: BaseAggregate::new(
            PaymentId::new(0),
            format!("PAY-{}", dto.client_id),
            String::new(),
        ),
        client_id: ClientId::new(dto.client_id),
        visa_application_id,
        amount: dto.amount,
        currency: dto
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        discount: dto.discount.unwrap_or(0.0),
        discount_type: dto.discount_type.as_deref().and_then(DiscountType::from_str),
        payment_status: dto
            .payment_status
            .as_deref()
            .map(PaymentStatus::from_str)
            .unwrap_or(PaymentStatus::Pending),
        payment_method: dto.payment_method.as_deref().and_then(PaymentMethod::from_str),
        payment_requested_date: dto.payment_requested_date,
        payment_received_date: dto.payment_received_date,
        transaction_id: dto.transaction_id,
        notes: dto.notes,
    };
    payment.base.description = format!(
        "{} - {:.2} {}",
        client.full_name(),
        payment.amount,
        payment.currency
    );

    Ok(repository::insert(&payment).await?)
}

pub async fn update(dto: PaymentDto) -> Result<(), ServiceError> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ServiceError::Validation("Invalid payment id".to_string()))?;

    let mut payment = get_by_id(id).await?;

    if dto.client_id != payment.client_id.value() {
        a001_client::service::get_by_id(dto.client_id).await?;
        payment.client_id = ClientId::new(dto.client_id);
    }
    payment.visa_application_id = resolve_application(&dto).await?;
    validate_amounts(&dto)?;

    payment.amount = dto.amount;
    if let Some(currency) = dto.currency {
        payment.currency = currency;
    }
    payment.discount = dto.discount.unwrap_or(payment.discount);
    payment.discount_type = dto.discount_type.as_deref().and_then(DiscountType::from_str);
    if let Some(status) = dto.payment_status.as_deref() {
        payment.payment_status = PaymentStatus::from_str(status);
    }
    payment.payment_method = dto.payment_method.as_deref().and_then(PaymentMethod::from_str);
    payment.payment_requested_date = dto.payment_requested_date;
    payment.payment_received_date = dto.payment_received_date;
    payment.transaction_id = dto.transaction_id;
    payment.notes = dto.notes;

    payment.base.touch();
    repository::update(&payment).await?;
    Ok(())
}

pub async fn delete(id: i64) -> Result<bool, ServiceError> {
    Ok(repository::soft_delete(id).await?)
}

/// An optional application link must point at an application of the same
/// client the payment belongs to.
async fn resolve_application(
    dto: &PaymentDto,
) -> Result<Option<VisaApplicationId>, ServiceError> {
    let Some(app_id) = dto.visa_application_id else {
        return Ok(None);
    };
    let app = a002_visa_application::service::get_by_id(app_id).await?;
    if app.client_id.value() != dto.client_id {
        return Err(ServiceError::Validation(
            "Application belongs to a different client".to_string(),
        ));
    }
    Ok(Some(app.base.id))
}

fn validate_amounts(dto: &PaymentDto) -> Result<(), ServiceError> {
    if dto.amount < 0.0 {
        return Err(ServiceError::Validation(
            "Amount must not be negative".to_string(),
        ));
    }
    if dto.discount.unwrap_or(0.0) < 0.0 {
        return Err(ServiceError::Validation(
            "Discount cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_client::aggregate::ClientDto;
    use contracts::domain::a002_visa_application::aggregate::VisaApplicationDto;

    async fn setup_db() {
        let path = std::env::temp_dir().join(format!(
            "invoice-service-tests-{}.db",
            std::process::id()
        ));
        let _ = crate::shared::data::db::initialize_database(path.to_str()).await;
    }

    async fn make_client(tag: &str) -> i64 {
        a001_client::service::create(ClientDto {
            id: None,
            first_name: "Test".to_string(),
            last_name: tag.to_string(),
            email: format!("{}@example.com", tag),
            phone: "+441234567890".to_string(),
            date_of_birth: None,
            passport_number: format!("P-{}", tag),
            nationality: "British".to_string(),
            country_of_residence: "UK".to_string(),
            preferred_contact_method: None,
            lead_source: None,
            client_status: None,
            visa_type: None,
            notes: None,
        })
        .await
        .unwrap()
    }

    async fn make_application(client_id: i64) -> i64 {
        a002_visa_application::service::create(VisaApplicationDto {
            id: None,
            client_id,
            visa_type: "schengen".to_string(),
            stage: None,
            appointment_date: None,
            appointment_location: None,
            decision: None,
            decision_date: None,
            decision_notes: None,
            assigned_agent: None,
            notes: None,
        })
        .await
        .unwrap()
    }

    fn dto(client_id: i64, amount: f64) -> PaymentDto {
        PaymentDto {
            id: None,
            client_id,
            amount,
            ..PaymentDto::default()
        }
    }

    #[tokio::test]
    async fn create_and_read_back() {
        setup_db().await;
        let client = make_client("payment-roundtrip").await;

        let mut payload = dto(client, 150.0);
        payload.discount = Some(25.0);
        payload.payment_status = Some("received".to_string());
        let id = create(payload).await.unwrap();

        let payment = get_by_id(id).await.unwrap();
        assert_eq!(payment.client_id.value(), client);
        assert_eq!(payment.payment_status, PaymentStatus::Received);
        assert_eq!(payment.final_amount(), 125.0);
    }

    #[tokio::test]
    async fn rejects_application_of_another_client() {
        setup_db().await;
        let client_a = make_client("payment-cross-a").await;
        let client_b = make_client("payment-cross-b").await;
        let app_b = make_application(client_b).await;

        let mut payload = dto(client_a, 100.0);
        payload.visa_application_id = Some(app_b);
        let err = create(payload).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        setup_db().await;
        let client = make_client("payment-negative").await;
        let err = create(dto(client, -1.0)).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
    }
}

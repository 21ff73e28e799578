use super::repository;
use crate::shared::error::ServiceError;
use contracts::domain::a001_client::aggregate::{
    Client, ClientDto, ClientId, ClientStatus, ContactMethod, VisaType,
};
use contracts::domain::common::BaseAggregate;

pub async fn get_by_id(id: i64) -> Result<Client, ServiceError> {
    repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Client"))
}

pub async fn list_all() -> Result<Vec<Client>, ServiceError> {
    Ok(repository::list_all().await?)
}

pub async fn create(dto: ClientDto) -> Result<i64, ServiceError> {
    validate(&dto)?;

    let full_name = format!("{} {}", dto.first_name.trim(), dto.last_name.trim());
    let base = BaseAggregate::new(
        ClientId::new(0),
        format!("CLT-{}", dto.passport_number.trim()),
        full_name,
    );

    let client = Client {
        base,
        first_name: dto.first_name.trim().to_string(),
        last_name: dto.last_name.trim().to_string(),
        email: dto.email.trim().to_string(),
        phone: dto.phone.trim().to_string(),
        date_of_birth: dto.date_of_birth,
        passport_number: dto.passport_number.trim().to_string(),
        nationality: dto.nationality,
        country_of_residence: dto.country_of_residence,
        preferred_contact_method: dto
            .preferred_contact_method
            .as_deref()
            .map(ContactMethod::from_str)
            .unwrap_or(ContactMethod::Email),
        lead_source: dto.lead_source.unwrap_or_else(|| "website".to_string()),
        client_status: dto
            .client_status
            .as_deref()
            .map(ClientStatus::from_str)
            .unwrap_or(ClientStatus::New),
        visa_type: dto.visa_type.as_deref().and_then(VisaType::from_str),
        notes: dto.notes,
    };

    Ok(repository::insert(&client).await?)
}

pub async fn update(dto: ClientDto) -> Result<(), ServiceError> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ServiceError::Validation("Invalid client id".to_string()))?;
    validate(&dto)?;

    let mut client = get_by_id(id).await?;
    client.first_name = dto.first_name.trim().to_string();
    client.last_name = dto.last_name.trim().to_string();
    client.base.description = client.full_name();
    client.email = dto.email.trim().to_string();
    client.phone = dto.phone.trim().to_string();
    client.date_of_birth = dto.date_of_birth;
    client.passport_number = dto.passport_number.trim().to_string();
    client.nationality = dto.nationality;
    client.country_of_residence = dto.country_of_residence;
    if let Some(method) = dto.preferred_contact_method.as_deref() {
        client.preferred_contact_method = ContactMethod::from_str(method);
    }
    if let Some(source) = dto.lead_source {
        client.lead_source = source;
    }
    if let Some(status) = dto.client_status.as_deref() {
        client.client_status = ClientStatus::from_str(status);
    }
    client.visa_type = dto.visa_type.as_deref().and_then(VisaType::from_str);
    client.notes = dto.notes;
    client.base.touch();

    Ok(repository::update(&client).await?)
}

pub async fn delete(id: i64) -> Result<bool, ServiceError> {
    Ok(repository::soft_delete(id).await?)
}

fn validate(dto: &ClientDto) -> Result<(), ServiceError> {
    if dto.first_name.trim().is_empty() || dto.last_name.trim().is_empty() {
        return Err(ServiceError::Validation("Name is required".to_string()));
    }
    if !dto.email.contains('@') {
        return Err(ServiceError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if dto.passport_number.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Passport number is required".to_string(),
        ));
    }
    Ok(())
}

use super::repository;
use crate::domain::a001_client;
use crate::shared::error::ServiceError;
use contracts::domain::a001_client::aggregate::{ClientId, ClientStatus, VisaType};
use contracts::domain::a002_visa_application::aggregate::{
    ApplicationStage, Decision, VisaApplication, VisaApplicationDto, VisaApplicationId,
};
use contracts::domain::common::BaseAggregate;

pub async fn get_by_id(id: i64) -> Result<VisaApplication, ServiceError> {
    repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Visa application"))
}

pub async fn list_all() -> Result<Vec<VisaApplication>, ServiceError> {
    Ok(repository::list_all().await?)
}

pub async fn list_by_client(client_id: i64) -> Result<Vec<VisaApplication>, ServiceError> {
    Ok(repository::list_by_client(client_id).await?)
}

pub async fn create(dto: VisaApplicationDto) -> Result<i64, ServiceError> {
    // The client must exist before an application can reference it
    a001_client::service::get_by_id(dto.client_id).await?;

    let visa_type = VisaType::from_str(&dto.visa_type)
        .ok_or_else(|| ServiceError::Validation(format!("Unknown visa type '{}'", dto.visa_type)))?;
    let stage = dto
        .stage
        .as_deref()
        .map(ApplicationStage::from_str)
        .unwrap_or(ApplicationStage::Initial);

    validate_appointment(stage, dto.appointment_date.as_deref())?;

    let mut app = VisaApplication {
        base: BaseAggregate::new(
            VisaApplicationId::new(0),
            format!("APP-{}", visa_type.as_str().to_uppercase()),
            String::new(),
        ),
        client_id: ClientId::new(dto.client_id),
        visa_type,
        stage,
        appointment_date: dto.appointment_date,
        appointment_location: dto.appointment_location,
        decision: dto.decision.as_deref().and_then(Decision::from_str),
        decision_date: dto.decision_date,
        decision_notes: dto.decision_notes,
        assigned_agent: dto.assigned_agent,
        notes: dto.notes,
    };
    app.base.description = app.display_label();

    let id = repository::insert(&app).await?;
    propagate_decision(&app).await?;
    Ok(id)
}

pub async fn update(dto: VisaApplicationDto) -> Result<(), ServiceError> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ServiceError::Validation("Invalid application id".to_string()))?;

    let mut app = get_by_id(id).await?;

    if let Some(visa_type) = VisaType::from_str(&dto.visa_type) {
        app.visa_type = visa_type;
    }
    if let Some(stage) = dto.stage.as_deref() {
        app.stage = ApplicationStage::from_str(stage);
    }
    validate_appointment(app.stage, dto.appointment_date.as_deref())?;

    app.appointment_date = dto.appointment_date;
    app.appointment_location = dto.appointment_location;
    app.decision = dto.decision.as_deref().and_then(Decision::from_str);
    app.decision_date = dto.decision_date;
    app.decision_notes = dto.decision_notes;
    app.assigned_agent = dto.assigned_agent;
    app.notes = dto.notes;
    app.base.description = app.display_label();
    app.base.touch();

    repository::update(&app).await?;
    propagate_decision(&app).await?;
    Ok(())
}

pub async fn delete(id: i64) -> Result<bool, ServiceError> {
    Ok(repository::soft_delete(id).await?)
}

/// A scheduled appointment must carry a date.
fn validate_appointment(
    stage: ApplicationStage,
    appointment_date: Option<&str>,
) -> Result<(), ServiceError> {
    if stage == ApplicationStage::AppointmentScheduled
        && appointment_date.map_or(true, |d| d.trim().is_empty())
    {
        return Err(ServiceError::Validation(
            "Appointment date is required when an appointment is scheduled".to_string(),
        ));
    }
    Ok(())
}

/// Once a decision is recorded, the owning client becomes a previous client.
async fn propagate_decision(app: &VisaApplication) -> Result<(), ServiceError> {
    if app.is_decided() {
        a001_client::repository::set_status(app.client_id.value(), ClientStatus::Previous)
            .await
            .map_err(ServiceError::Internal)?;
    }
    Ok(())
}

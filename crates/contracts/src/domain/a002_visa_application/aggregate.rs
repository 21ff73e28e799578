use crate::domain::a001_client::aggregate::{ClientId, VisaType};
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

/// ID type for the Visa Application aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisaApplicationId(pub i64);

impl VisaApplicationId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for VisaApplicationId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(VisaApplicationId::new)
            .map_err(|e| format!("Invalid visa application id: {}", e))
    }
}

/// Lifecycle stage of a visa application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStage {
    Initial,
    DocumentCollected,
    PaymentRequested,
    PaymentReceived,
    AppointmentScheduled,
    AppointmentAttended,
    WaitingForDecision,
    DecisionReceived,
}

impl ApplicationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStage::Initial => "initial",
            ApplicationStage::DocumentCollected => "document_collected",
            ApplicationStage::PaymentRequested => "payment_requested",
            ApplicationStage::PaymentReceived => "payment_received",
            ApplicationStage::AppointmentScheduled => "appointment_scheduled",
            ApplicationStage::AppointmentAttended => "appointment_attended",
            ApplicationStage::WaitingForDecision => "waiting_for_decision",
            ApplicationStage::DecisionReceived => "decision_received",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "document_collected" => ApplicationStage::DocumentCollected,
            "payment_requested" => ApplicationStage::PaymentRequested,
            "payment_received" => ApplicationStage::PaymentReceived,
            "appointment_scheduled" => ApplicationStage::AppointmentScheduled,
            "appointment_attended" => ApplicationStage::AppointmentAttended,
            "waiting_for_decision" => ApplicationStage::WaitingForDecision,
            "decision_received" => ApplicationStage::DecisionReceived,
            _ => ApplicationStage::Initial,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStage::Initial => "Initial",
            ApplicationStage::DocumentCollected => "Document Collected",
            ApplicationStage::PaymentRequested => "Payment Requested",
            ApplicationStage::PaymentReceived => "Payment Received",
            ApplicationStage::AppointmentScheduled => "Appointment Scheduled",
            ApplicationStage::AppointmentAttended => "Appointment Attended",
            ApplicationStage::WaitingForDecision => "Waiting for Decision",
            ApplicationStage::DecisionReceived => "Decision Received",
        }
    }
}

/// Outcome of a decided application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(Decision::Approved),
            "rejected" => Some(Decision::Rejected),
            _ => None,
        }
    }
}

/// Visa Application aggregate (a002)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisaApplication {
    #[serde(flatten)]
    pub base: BaseAggregate<VisaApplicationId>,

    pub client_id: ClientId,
    pub visa_type: VisaType,
    pub stage: ApplicationStage,

    pub appointment_date: Option<String>,
    pub appointment_location: Option<String>,

    pub decision: Option<Decision>,
    pub decision_date: Option<String>,
    pub decision_notes: Option<String>,

    pub assigned_agent: Option<String>,
    pub notes: Option<String>,
}

impl VisaApplication {
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Display label consumed by the invoice picker: `"{visa type} - {stage}"`.
    /// The ` - ` separator is the convention the picker splits labels on.
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.visa_type.label(), self.stage.label())
    }

    /// An application is decided once a decision is recorded in the final stage.
    /// The owning client flips to "previous" at that point.
    pub fn is_decided(&self) -> bool {
        self.stage == ApplicationStage::DecisionReceived && self.decision.is_some()
    }
}

impl AggregateRoot for VisaApplication {
    type Id = VisaApplicationId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "visa_application"
    }

    fn element_name() -> &'static str {
        "Visa Application"
    }

    fn list_name() -> &'static str {
        "Visa Applications"
    }
}

/// DTO for create/update from the application form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisaApplicationDto {
    pub id: Option<String>,
    pub client_id: i64,
    pub visa_type: String,
    pub stage: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_location: Option<String>,
    pub decision: Option<String>,
    pub decision_date: Option<String>,
    pub decision_notes: Option<String>,
    pub assigned_agent: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::BaseAggregate;

    fn app(visa_type: VisaType, stage: ApplicationStage) -> VisaApplication {
        VisaApplication {
            base: BaseAggregate::new(
                VisaApplicationId::new(1),
                "APP-1".to_string(),
                String::new(),
            ),
            client_id: ClientId::new(1),
            visa_type,
            stage,
            appointment_date: None,
            appointment_location: None,
            decision: None,
            decision_date: None,
            decision_notes: None,
            assigned_agent: None,
            notes: None,
        }
    }

    #[test]
    fn display_label_uses_dash_separator() {
        let a = app(VisaType::Schengen, ApplicationStage::DocumentCollected);
        assert_eq!(a.display_label(), "Schengen - Document Collected");
    }

    #[test]
    fn decided_requires_final_stage_and_decision() {
        let mut a = app(VisaType::Uk, ApplicationStage::DecisionReceived);
        assert!(!a.is_decided());
        a.decision = Some(Decision::Approved);
        assert!(a.is_decided());
        a.stage = ApplicationStage::WaitingForDecision;
        assert!(!a.is_decided());
    }
}

use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

/// ID type for the Client aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub i64);

impl ClientId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for ClientId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(ClientId::new)
            .map_err(|e| format!("Invalid client id: {}", e))
    }
}

/// Lifecycle status of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    New,
    Previous,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::New => "new",
            ClientStatus::Previous => "previous",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "previous" => ClientStatus::Previous,
            _ => ClientStatus::New,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::New => "New",
            ClientStatus::Previous => "Previous",
        }
    }
}

/// Visa type / destination country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaType {
    Schengen,
    Us,
    Uk,
    Au,
    Nz,
}

impl VisaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisaType::Schengen => "schengen",
            VisaType::Us => "us",
            VisaType::Uk => "uk",
            VisaType::Au => "au",
            VisaType::Nz => "nz",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "schengen" => Some(VisaType::Schengen),
            "us" => Some(VisaType::Us),
            "uk" => Some(VisaType::Uk),
            "au" => Some(VisaType::Au),
            "nz" => Some(VisaType::Nz),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisaType::Schengen => "Schengen",
            VisaType::Us => "US",
            VisaType::Uk => "UK",
            VisaType::Au => "AU",
            VisaType::Nz => "NZ",
        }
    }

    pub fn all() -> &'static [VisaType] {
        &[
            VisaType::Schengen,
            VisaType::Us,
            VisaType::Uk,
            VisaType::Au,
            VisaType::Nz,
        ]
    }
}

/// Preferred way to reach the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
    Whatsapp,
    Sms,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
            ContactMethod::Whatsapp => "whatsapp",
            ContactMethod::Sms => "sms",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "phone" => ContactMethod::Phone,
            "whatsapp" => ContactMethod::Whatsapp,
            "sms" => ContactMethod::Sms,
            _ => ContactMethod::Email,
        }
    }
}

/// Client aggregate (a001)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(flatten)]
    pub base: BaseAggregate<ClientId>,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<String>,

    pub passport_number: String,
    pub nationality: String,
    pub country_of_residence: String,

    pub preferred_contact_method: ContactMethod,
    pub lead_source: String,
    pub client_status: ClientStatus,
    pub visa_type: Option<VisaType>,
    pub notes: Option<String>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }
}

impl AggregateRoot for Client {
    type Id = ClientId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "client"
    }

    fn element_name() -> &'static str {
        "Client"
    }

    fn list_name() -> &'static str {
        "Clients"
    }
}

/// DTO for create/update from the client form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientDto {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<String>,
    pub passport_number: String,
    pub nationality: String,
    pub country_of_residence: String,
    pub preferred_contact_method: Option<String>,
    pub lead_source: Option<String>,
    pub client_status: Option<String>,
    pub visa_type: Option<String>,
    pub notes: Option<String>,
}

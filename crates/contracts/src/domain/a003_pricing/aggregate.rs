use crate::domain::a001_client::aggregate::VisaType;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "GBP";

/// ID type for the Pricing aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingId(pub i64);

impl PricingId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for PricingId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(PricingId::new)
            .map_err(|e| format!("Invalid pricing id: {}", e))
    }
}

/// Pricing aggregate (a003): one active price per visa type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(flatten)]
    pub base: BaseAggregate<PricingId>,

    pub visa_type: VisaType,
    pub amount: f64,
    pub currency: String,
    pub is_active: bool,
}

impl Pricing {
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Fallback price when no active pricing row exists for a visa type.
    pub fn default_amount(visa_type: VisaType) -> f64 {
        match visa_type {
            VisaType::Schengen => 125.0,
            _ => 150.0,
        }
    }
}

impl AggregateRoot for Pricing {
    type Id = PricingId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "pricing"
    }

    fn element_name() -> &'static str {
        "Pricing"
    }

    fn list_name() -> &'static str {
        "Pricing"
    }
}

/// DTO for create/update from the pricing form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingDto {
    pub id: Option<String>,
    pub visa_type: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

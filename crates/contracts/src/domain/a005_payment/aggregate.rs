use crate::domain::a001_client::aggregate::ClientId;
use crate::domain::a002_visa_application::aggregate::VisaApplicationId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

/// ID type for the Payment aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub i64);

impl PaymentId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for PaymentId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(PaymentId::new)
            .map_err(|e| format!("Invalid payment id: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Requested,
    Received,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Requested => "requested",
            PaymentStatus::Received => "received",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "requested" => PaymentStatus::Requested,
            "received" => PaymentStatus::Received,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Requested => "Payment Requested",
            PaymentStatus::Received => "Received",
            PaymentStatus::Refunded => "Refunded",
        }
    }

    pub fn all() -> &'static [PaymentStatus] {
        &[
            PaymentStatus::Pending,
            PaymentStatus::Requested,
            PaymentStatus::Received,
            PaymentStatus::Refunded,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    CreditCard,
    DebitCard,
    Cash,
    OnlinePayment,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::OnlinePayment => "online_payment",
            PaymentMethod::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "credit_card" => Some(PaymentMethod::CreditCard),
            "debit_card" => Some(PaymentMethod::DebitCard),
            "cash" => Some(PaymentMethod::Cash),
            "online_payment" => Some(PaymentMethod::OnlinePayment),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Referral,
    General,
    Sale,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Referral => "referral",
            DiscountType::General => "general",
            DiscountType::Sale => "sale",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "referral" => Some(DiscountType::Referral),
            "general" => Some(DiscountType::General),
            "sale" => Some(DiscountType::Sale),
            _ => None,
        }
    }
}

/// Payment aggregate (a005): money received from a client, optionally tied
/// to a specific visa application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(flatten)]
    pub base: BaseAggregate<PaymentId>,

    pub client_id: ClientId,
    pub visa_application_id: Option<VisaApplicationId>,
    pub amount: f64,
    pub currency: String,
    pub discount: f64,
    pub discount_type: Option<DiscountType>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_requested_date: Option<String>,
    pub payment_received_date: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

impl Payment {
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Amount after discount, never below zero.
    pub fn final_amount(&self) -> f64 {
        (self.amount - self.discount).max(0.0)
    }
}

impl AggregateRoot for Payment {
    type Id = PaymentId;

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
        "a005"
    }

    fn collection_name() -> &'static str {
        "payments"
    }

    fn element_name() -> &'static str {
        "Payment"
    }

    fn list_name() -> &'static str {
        "Payments"
    }
}

/// DTO for create/update from the payment form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentDto {
    pub id: Option<String>,
    pub client_id: i64,
    pub visa_application_id: Option<i64>,
    pub amount: f64,
    pub currency: Option<String>,
    pub discount: Option<f64>,
    pub discount_type: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_requested_date: Option<String>,
    pub payment_received_date: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: f64, discount: f64) -> Payment {
        Payment {
            base: BaseAggregate::new(PaymentId::new(1), "PAY-1".to_string(), String::new()),
            client_id: ClientId::new(1),
            visa_application_id: None,
            amount,
            currency: "GBP".to_string(),
            discount,
            discount_type: None,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            payment_requested_date: None,
            payment_received_date: None,
            transaction_id: None,
            notes: None,
        }
    }

    #[test]
    fn final_amount_subtracts_discount() {
        assert_eq!(payment(150.0, 25.0).final_amount(), 125.0);
    }

    #[test]
    fn final_amount_never_negative() {
        assert_eq!(payment(50.0, 80.0).final_amount(), 0.0);
    }

    #[test]
    fn unknown_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::from_str("gone"), PaymentStatus::Pending);
    }
}

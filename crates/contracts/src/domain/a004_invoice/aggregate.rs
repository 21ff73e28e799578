use crate::domain::a001_client::aggregate::ClientId;
use crate::domain::a002_visa_application::aggregate::VisaApplicationId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

/// ID type for the Invoice aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub i64);

impl InvoiceId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for InvoiceId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(InvoiceId::new)
            .map_err(|e| format!("Invalid invoice id: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "sent" => InvoiceStatus::Sent,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Draft,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    pub fn all() -> &'static [InvoiceStatus] {
        &[
            InvoiceStatus::Draft,
            InvoiceStatus::Sent,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ]
    }
}

/// One attached visa application with the unit price captured at attach time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub visa_application_id: VisaApplicationId,
    pub unit_price: f64,
}

/// Invoice aggregate (a004)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(flatten)]
    pub base: BaseAggregate<InvoiceId>,

    pub client_id: ClientId,
    /// Unique number, e.g. "INV-2025-0001"
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: Option<String>,

    pub subtotal: f64,
    pub discount: f64,
    /// Percentage, e.g. 20.0 for 20%
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub currency: String,

    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub sent_date: Option<String>,
    pub paid_date: Option<String>,
}

impl Invoice {
    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Recompute tax and total from subtotal, discount and tax rate.
    pub fn recalculate(&mut self) {
        let after_discount = self.subtotal - self.discount;
        self.tax_amount = after_discount * self.tax_rate / 100.0;
        self.total_amount = after_discount + self.tax_amount;
    }

    /// Replace the subtotal from attached lines and recompute derived amounts.
    pub fn apply_lines(&mut self, lines: &[InvoiceLine]) {
        self.subtotal = lines.iter().map(|l| l.unit_price).sum();
        self.recalculate();
    }

    /// Next invoice number in a year sequence, `INV-{year}-{seq:04}`.
    /// `last_number` is the highest existing number for that year, if any.
    pub fn next_number(year: i32, last_number: Option<&str>) -> String {
        let next_seq = last_number
            .and_then(|n| n.rsplit('-').next())
            .and_then(|tail| tail.parse::<u32>().ok())
            .map(|n| n + 1)
            .unwrap_or(1);
        format!("INV-{}-{:04}", year, next_seq)
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "invoice"
    }

    fn element_name() -> &'static str {
        "Invoice"
    }

    fn list_name() -> &'static str {
        "Invoices"
    }
}

/// DTO for creating/updating an invoice from the editor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceDto {
    pub id: Option<String>,
    pub client_id: i64,
    pub due_date: Option<String>,
    pub discount: Option<f64>,
    pub tax_rate: Option<f64>,
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Serialized picker payload: the selected line items at submit time
    pub items: Vec<crate::picker::LineItem>,
}

/// Invoice with its attached applications rendered as picker line items,
/// as returned to the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub invoice: Invoice,
    pub selected_items: Vec<crate::picker::LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> Invoice {
        Invoice {
            base: BaseAggregate::new(InvoiceId::new(1), "INV-2025-0001".to_string(), String::new()),
            client_id: ClientId::new(1),
            invoice_number: "INV-2025-0001".to_string(),
            invoice_date: "2025-06-01".to_string(),
            due_date: None,
            subtotal: 0.0,
            discount: 0.0,
            tax_rate: 0.0,
            tax_amount: 0.0,
            total_amount: 0.0,
            currency: "GBP".to_string(),
            status: InvoiceStatus::Draft,
            notes: None,
            sent_date: None,
            paid_date: None,
        }
    }

    #[test]
    fn recalculate_applies_discount_then_tax() {
        let mut inv = invoice();
        inv.subtotal = 300.0;
        inv.discount = 50.0;
        inv.tax_rate = 20.0;
        inv.recalculate();
        assert_eq!(inv.tax_amount, 50.0);
        assert_eq!(inv.total_amount, 300.0);
    }

    #[test]
    fn apply_lines_sums_unit_prices() {
        let mut inv = invoice();
        let lines = vec![
            InvoiceLine {
                visa_application_id: VisaApplicationId::new(1),
                unit_price: 125.0,
            },
            InvoiceLine {
                visa_application_id: VisaApplicationId::new(2),
                unit_price: 150.0,
            },
        ];
        inv.apply_lines(&lines);
        assert_eq!(inv.subtotal, 275.0);
        assert_eq!(inv.total_amount, 275.0);
    }

    #[test]
    fn next_number_continues_year_sequence() {
        assert_eq!(Invoice::next_number(2025, None), "INV-2025-0001");
        assert_eq!(
            Invoice::next_number(2025, Some("INV-2025-0041")),
            "INV-2025-0042"
        );
        // Garbage tail restarts the sequence rather than failing
        assert_eq!(Invoice::next_number(2025, Some("INV-2025-x")), "INV-2025-0001");
    }
}

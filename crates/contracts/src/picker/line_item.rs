use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator between the category and status parts of a line-item label,
/// e.g. "Schengen - Document Collected".
pub const LABEL_SEPARATOR: &str = " - ";

/// One selectable billable entity (a visa application from the invoice's
/// point of view).
///
/// Deserialization is deliberately tolerant of the provider's shape:
/// the label may arrive as `name`, `display` or `text`, and `price` may be
/// a JSON number or a numeric string. A malformed price degrades to `0`
/// instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    #[serde(rename = "name", alias = "display", alias = "text")]
    pub label: String,
    #[serde(
        serialize_with = "serialize_price",
        deserialize_with = "deserialize_price",
        default
    )]
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl LineItem {
    pub fn new(id: i64, label: impl Into<String>, price: f64, currency: Option<String>) -> Self {
        Self {
            id,
            label: label.into(),
            price,
            currency,
        }
    }

    /// Split the label into (category, status) on the first ` - `.
    /// Without the separator the whole label is the category.
    pub fn label_parts(&self) -> (&str, &str) {
        match self.label.split_once(LABEL_SEPARATOR) {
            Some((category, status)) => (category, status),
            None => (self.label.as_str(), ""),
        }
    }

    /// Zero or missing price is a valid but flagged state ("no price set")
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }

    /// Price rendered with two decimal places
    pub fn price_display(&self) -> String {
        format!("{:.2}", self.price)
    }
}

/// Prices travel as 2-decimal strings on the wire
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", price))
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
        Null,
    }

    let price = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) if n.is_finite() && n >= 0.0 => n,
        RawPrice::Number(_) => 0.0,
        RawPrice::Text(s) => s.trim().parse::<f64>().ok().filter(|n| *n >= 0.0).unwrap_or(0.0),
        RawPrice::Null => 0.0,
    };
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_text_prices() {
        let a: LineItem = serde_json::from_str(r#"{"id":1,"name":"UK - Initial","price":150}"#).unwrap();
        assert_eq!(a.price, 150.0);

        let b: LineItem =
            serde_json::from_str(r#"{"id":2,"name":"Schengen - Initial","price":"125.00"}"#).unwrap();
        assert_eq!(b.price, 125.0);
    }

    #[test]
    fn malformed_price_defaults_to_zero() {
        let item: LineItem =
            serde_json::from_str(r#"{"id":3,"name":"US - Initial","price":"n/a"}"#).unwrap();
        assert_eq!(item.price, 0.0);
        assert!(!item.has_price());

        let negative: LineItem =
            serde_json::from_str(r#"{"id":4,"name":"US - Initial","price":"-10"}"#).unwrap();
        assert_eq!(negative.price, 0.0);

        let missing: LineItem = serde_json::from_str(r#"{"id":5,"name":"US - Initial"}"#).unwrap();
        assert_eq!(missing.price, 0.0);
    }

    #[test]
    fn label_field_fallbacks() {
        let display: LineItem =
            serde_json::from_str(r#"{"id":1,"display":"AU - Initial","price":"150.00"}"#).unwrap();
        assert_eq!(display.label, "AU - Initial");

        let text: LineItem =
            serde_json::from_str(r#"{"id":2,"text":"NZ - Initial","price":"150.00"}"#).unwrap();
        assert_eq!(text.label, "NZ - Initial");
    }

    #[test]
    fn label_parts_split_on_separator() {
        let item = LineItem::new(1, "Schengen - Waiting for Decision", 125.0, None);
        assert_eq!(item.label_parts(), ("Schengen", "Waiting for Decision"));

        let plain = LineItem::new(2, "Consultation", 50.0, None);
        assert_eq!(plain.label_parts(), ("Consultation", ""));
    }

    #[test]
    fn price_serialized_as_two_decimal_string() {
        let item = LineItem::new(7, "UK - Initial", 150.0, Some("GBP".to_string()));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], "150.00");
        assert_eq!(json["name"], "UK - Initial");
        assert_eq!(json["currency"], "GBP");
    }
}

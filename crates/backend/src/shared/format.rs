/// Formats a money amount with two decimal places
///
/// # Examples
/// ```
/// use backend::shared::format::format_money;
/// assert_eq!(format_money(150.0), "150.00");
/// assert_eq!(format_money(99.5), "99.50");
/// ```
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Parses a money amount from user or wire input.
/// Accepts plain numbers with optional surrounding whitespace;
/// anything unparseable yields `None`.
pub fn parse_money(input: &str) -> Option<f64> {
    let value = input.trim().parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(125.0), "125.00");
        assert_eq!(format_money(99.999), "100.00");
        assert_eq!(format_money(1234.5), "1234.50");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("150"), Some(150.0));
        assert_eq!(parse_money(" 125.00 "), Some(125.0));
        assert_eq!(parse_money("-5"), None);
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money(""), None);
    }
}

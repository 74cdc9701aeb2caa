//! Formatting utilities for rendered result cells.

use serde_json::Value;

/// Format one table cell for display.
///
/// - null/absent → `"N/A"`
/// - numbers → en-US style with thousands separators and exactly two
///   decimals (`1` → `"1.00"`, `1234567.5` → `"1,234,567.50"`)
/// - everything else → its string form
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Two-decimal en-US number formatting with comma thousands separators.
pub fn format_number(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (integer, decimals) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && rendered != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_number_two_decimals() {
        assert_eq!(format_number(1.0), "1.00");
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(2.5), "2.50");
    }

    #[test]
    fn test_format_number_thousands_separators() {
        assert_eq!(format_number(1234.0), "1,234.00");
        assert_eq!(format_number(1234567.5), "1,234,567.50");
        assert_eq!(format_number(100.0), "100.00");
        assert_eq!(format_number(1000.0), "1,000.00");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-1234.5), "-1,234.50");
        assert_eq!(format_number(-0.001), "0.00");
    }

    #[test]
    fn test_format_cell_null_and_missing() {
        assert_eq!(format_cell(None), "N/A");
        assert_eq!(format_cell(Some(&json!(null))), "N/A");
    }

    #[test]
    fn test_format_cell_number() {
        assert_eq!(format_cell(Some(&json!(1))), "1.00");
        assert_eq!(format_cell(Some(&json!(1234567.891))), "1,234,567.89");
    }

    #[test]
    fn test_format_cell_string_passthrough() {
        assert_eq!(format_cell(Some(&json!("North East"))), "North East");
    }

    #[test]
    fn test_format_cell_bool() {
        assert_eq!(format_cell(Some(&json!(true))), "true");
    }
}

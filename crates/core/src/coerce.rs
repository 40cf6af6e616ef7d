//! Permissive numeric coercion for partially edited cart rows.
//!
//! Anything that is not a non-negative number (or a string holding one) becomes zero.

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value into a non-negative decimal amount.
pub fn decimal_from_value(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };

    parsed
        .filter(|amount| !amount.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Coerce a JSON value into a whole quantity, truncating fractions.
pub fn quantity_from_value(value: &Value) -> u32 {
    decimal_from_value(value).trunc().to_u32().unwrap_or(0)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_err| Decimal::from_scientific(text))
        .ok()
}

pub(crate) fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.as_ref().map_or(0, quantity_from_value))
}

pub(crate) fn lenient_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Decimal, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.as_ref().map_or(Decimal::ZERO, decimal_from_value))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        assert_eq!(decimal_from_value(&json!(2.5)), Decimal::new(25, 1));
        assert_eq!(decimal_from_value(&json!(" 10.00 ")), Decimal::new(1000, 2));
        assert_eq!(quantity_from_value(&json!("3")), 3);
    }

    #[test]
    fn non_numeric_values_become_zero() {
        assert_eq!(quantity_from_value(&json!("abc")), 0);
        assert_eq!(quantity_from_value(&json!(null)), 0);
        assert_eq!(decimal_from_value(&json!({"price": 1})), Decimal::ZERO);
        assert_eq!(decimal_from_value(&json!(true)), Decimal::ZERO);
    }

    #[test]
    fn negative_values_become_zero() {
        assert_eq!(quantity_from_value(&json!(-4)), 0);
        assert_eq!(decimal_from_value(&json!("-1.5")), Decimal::ZERO);
    }

    #[test]
    fn fractional_quantities_are_truncated() {
        assert_eq!(quantity_from_value(&json!(2.9)), 2);
    }
}

//! Typed ERP records.
//!
//! Odoo reports empty scalar and relational fields as `false`; the helpers
//! here map that to `None` instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::Value;
use till::coerce::decimal_from_value;

pub(crate) fn odoo_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        value => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
    }
}

fn odoo_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    odoo_optional::<D, String>(deserializer).map(Option::unwrap_or_default)
}

fn odoo_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Value::deserialize(deserializer).map(|value| decimal_from_value(&value))
}

/// A many2one reference, serialized by Odoo as `[id, "display name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Many2One(pub i64, pub String);

impl Many2One {
    pub fn id(&self) -> i64 {
        self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }
}

/// A customer (`res.partner`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Partner {
    pub id: i64,

    #[serde(default, deserialize_with = "odoo_string")]
    pub name: String,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub street: Option<String>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub street2: Option<String>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub zip: Option<String>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub country_id: Option<Many2One>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub phone: Option<String>,
}

impl Partner {
    /// Field list requested when reading partners.
    pub const FIELDS: [&'static str; 9] = [
        "id",
        "name",
        "street",
        "street2",
        "city",
        "zip",
        "country_id",
        "email",
        "phone",
    ];

    /// Single-line postal address, or `None` when every part is blank.
    pub fn address(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.street.as_deref(),
            self.street2.as_deref(),
            self.city.as_deref(),
            self.zip.as_deref(),
            self.country_id.as_ref().map(Many2One::name),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// A saleable product (`product.product`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub id: i64,

    #[serde(default, deserialize_with = "odoo_string")]
    pub display_name: String,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub default_code: Option<String>,

    #[serde(default, deserialize_with = "odoo_decimal")]
    pub list_price: Decimal,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub uom_id: Option<Many2One>,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub categ_id: Option<Many2One>,
}

impl ProductSummary {
    pub const FIELDS: [&'static str; 6] = [
        "id",
        "display_name",
        "default_code",
        "list_price",
        "uom_id",
        "categ_id",
    ];
}

/// A product category (`product.category`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: i64,

    #[serde(default, deserialize_with = "odoo_string")]
    pub name: String,

    #[serde(default, deserialize_with = "odoo_optional")]
    pub parent_id: Option<Many2One>,
}

/// A payment journal (`account.journal`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentJournal {
    pub id: i64,

    #[serde(default, deserialize_with = "odoo_string")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "odoo_string")]
    pub journal_type: String,
}

/// One allowed value of a selection field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectionOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldDescription {
    #[serde(default)]
    pub selection: Vec<(String, String)>,
}

impl From<(String, String)> for SelectionOption {
    fn from((value, label): (String, String)) -> Self {
        Self { value, label }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn partner_false_fields_become_none() -> TestResult {
        let partner: Partner = serde_json::from_value(json!({
            "id": 9,
            "name": "Acme",
            "street": false,
            "street2": false,
            "city": "Lyon",
            "zip": false,
            "country_id": [75, "France"],
            "email": false,
            "phone": false
        }))?;

        assert_eq!(partner.street, None);
        assert_eq!(partner.country_id.as_ref().map(Many2One::id), Some(75));
        assert_eq!(partner.address().as_deref(), Some("Lyon, France"));

        Ok(())
    }

    #[test]
    fn partner_without_address_parts_has_no_address() -> TestResult {
        let partner: Partner = serde_json::from_value(json!({
            "id": 1,
            "name": "Walk-in",
            "street": "  ",
            "city": false
        }))?;

        assert_eq!(partner.address(), None);

        Ok(())
    }

    #[test]
    fn product_price_is_decoded() -> TestResult {
        let product: ProductSummary = serde_json::from_value(json!({
            "id": 3,
            "display_name": "[TEA] Green tea",
            "default_code": "TEA",
            "list_price": 4.5,
            "uom_id": [1, "Units"],
            "categ_id": false
        }))?;

        assert_eq!(product.list_price, Decimal::new(45, 1));
        assert_eq!(product.categ_id, None);

        Ok(())
    }
}

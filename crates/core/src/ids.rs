//! Typed ERP identifiers

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use thiserror::Error;

/// Errors raised when constructing an [`ExternalId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExternalIdError {
    /// The identifier was an empty or whitespace-only string.
    #[error("identifier cannot be empty")]
    Empty,
}

/// An identifier assigned by the ERP: either a database integer or a string code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ExternalId {
    /// Integer record id.
    Numeric(i64),

    /// Non-empty string code.
    Code(String),
}

impl ExternalId {
    /// Build a string-coded identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalIdError::Empty`] when `code` is blank.
    pub fn code(code: impl Into<String>) -> Result<Self, ExternalIdError> {
        let code = code.into();

        if code.trim().is_empty() {
            return Err(ExternalIdError::Empty);
        }

        Ok(Self::Code(code))
    }

    /// Returns the integer id, if this identifier is numeric.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Numeric(id) => Some(*id),
            Self::Code(_) => None,
        }
    }
}

impl Display for ExternalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Numeric(id) => Display::fmt(id, f),
            Self::Code(code) => f.write_str(code),
        }
    }
}

impl FromStr for ExternalId {
    type Err = ExternalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        match trimmed.parse::<i64>() {
            Ok(id) => Ok(Self::Numeric(id)),
            Err(_) => Self::code(trimmed),
        }
    }
}

impl From<i64> for ExternalId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExternalId {
    Numeric(i64),
    Code(String),
}

impl<'de> Deserialize<'de> for ExternalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawExternalId::deserialize(deserializer)? {
            RawExternalId::Numeric(id) => Ok(Self::Numeric(id)),
            RawExternalId::Code(code) => Self::code(code).map_err(D::Error::custom),
        }
    }
}

/// An [`ExternalId`] tagged with the kind of record it refers to.
pub struct TypedId<T>(ExternalId, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap an untyped identifier.
    pub const fn from_external(id: ExternalId) -> Self {
        Self(id, PhantomData)
    }

    /// Borrow the untyped identifier.
    pub fn as_external(&self) -> &ExternalId {
        &self.0
    }

    /// Unwrap into the untyped identifier.
    #[must_use]
    pub fn into_external(self) -> ExternalId {
        self.0
    }

    /// Returns the integer id, if numeric.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<ExternalId> for TypedId<T> {
    fn from(value: ExternalId) -> Self {
        Self::from_external(value)
    }
}

impl<T> From<i64> for TypedId<T> {
    fn from(value: i64) -> Self {
        Self::from_external(ExternalId::Numeric(value))
    }
}

impl<T> FromStr for TypedId<T> {
    type Err = ExternalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::from_external)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ExternalId::deserialize(deserializer).map(Self::from_external)
    }
}

/// Marker for product records.
#[derive(Debug)]
pub enum ProductRecord {}

/// Marker for customer (partner) records.
#[derive(Debug)]
pub enum CustomerRecord {}

/// Marker for warehouse records.
#[derive(Debug)]
pub enum WarehouseRecord {}

/// Marker for tax records.
#[derive(Debug)]
pub enum TaxRecord {}

/// Marker for unit of measure records.
#[derive(Debug)]
pub enum UomRecord {}

/// Marker for sale order records.
#[derive(Debug)]
pub enum SaleOrderRecord {}

/// Marker for invoice records.
#[derive(Debug)]
pub enum InvoiceRecord {}

/// Marker for point-of-sale order records.
#[derive(Debug)]
pub enum PosOrderRecord {}

/// Product id
pub type ProductId = TypedId<ProductRecord>;

/// Customer id
pub type CustomerId = TypedId<CustomerRecord>;

/// Warehouse id
pub type WarehouseId = TypedId<WarehouseRecord>;

/// Tax id
pub type TaxId = TypedId<TaxRecord>;

/// Unit of measure id
pub type UomId = TypedId<UomRecord>;

/// Sale order id
pub type SaleOrderId = TypedId<SaleOrderRecord>;

/// Invoice id
pub type InvoiceId = TypedId<InvoiceRecord>;

/// POS order id
pub type PosOrderId = TypedId<PosOrderRecord>;

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn numeric_strings_parse_as_numeric_ids() -> TestResult {
        assert_eq!("42".parse::<ExternalId>()?, ExternalId::Numeric(42));
        assert_eq!("p1".parse::<ExternalId>()?, ExternalId::Code("p1".to_string()));

        Ok(())
    }

    #[test]
    fn blank_codes_are_rejected() {
        assert_eq!(ExternalId::code("  "), Err(ExternalIdError::Empty));
        assert_eq!("".parse::<ExternalId>(), Err(ExternalIdError::Empty));
    }

    #[test]
    fn deserializing_empty_string_fails() {
        let result = serde_json::from_str::<ProductId>("\"\"");

        assert!(result.is_err(), "empty product id should not deserialize");
    }

    #[test]
    fn typed_ids_serialize_as_bare_values() -> TestResult {
        let numeric = ProductId::from(7_i64);
        let code: ProductId = "p1".parse()?;

        assert_eq!(serde_json::to_string(&numeric)?, "7");
        assert_eq!(serde_json::to_string(&code)?, "\"p1\"");

        Ok(())
    }
}

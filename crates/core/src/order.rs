//! Order drafts
//!
//! The resolved, ephemeral request handed to the ERP when a cart is submitted.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::CartLine,
    ids::{CustomerId, ProductId, TaxId, WarehouseId},
};

/// A cart line in the shape the ERP expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// Product reference.
    pub product_id: ProductId,

    /// Ordered quantity.
    pub quantity: u32,

    /// Unit price.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price_unit: Decimal,

    /// Tax applied to the line, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<TaxId>,
}

impl OrderLine {
    /// Map a cart line, attaching the given tax.
    pub fn from_cart_line(line: &CartLine, tax_id: Option<TaxId>) -> Self {
        Self {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            price_unit: line.unit_price,
            tax_id,
        }
    }
}

/// Fields that must be resolved before an order can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    /// The ordering customer.
    CustomerId,

    /// The warehouse stock is taken from.
    WarehouseId,

    /// The delivery address.
    Address,
}

impl RequiredField {
    /// Field name as reported to users.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerId => "customer_id",
            Self::WarehouseId => "warehouse_id",
            Self::Address => "address",
        }
    }
}

impl Display for RequiredField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Every required field that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("missing required order fields: {}", join_fields(.0))]
pub struct MissingFields(SmallVec<[RequiredField; 3]>);

impl MissingFields {
    /// Record a missing field, ignoring duplicates.
    pub fn push(&mut self, field: RequiredField) {
        if !self.0.contains(&field) {
            self.0.push(field);
        }
    }

    /// Whether nothing is missing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` is among the missing fields.
    pub fn contains(&self, field: RequiredField) -> bool {
        self.0.contains(&field)
    }

    /// Missing fields in the order they were recorded.
    pub fn fields(&self) -> &[RequiredField] {
        &self.0
    }
}

impl FromIterator<RequiredField> for MissingFields {
    fn from_iter<I: IntoIterator<Item = RequiredField>>(iter: I) -> Self {
        let mut missing = Self::default();

        for field in iter {
            missing.push(field);
        }

        missing
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A fully resolved order submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    /// Ordering customer.
    pub customer_id: CustomerId,

    /// Source warehouse.
    pub warehouse_id: WarehouseId,

    /// Delivery address.
    pub address: String,

    /// Billable lines.
    pub lines: Vec<OrderLine>,
}

impl OrderDraft {
    /// Build a draft from resolved fields and the billable lines of a cart.
    pub fn new<'a>(
        customer_id: CustomerId,
        warehouse_id: WarehouseId,
        address: String,
        lines: impl IntoIterator<Item = &'a CartLine>,
        tax_id: Option<&TaxId>,
    ) -> Self {
        Self {
            customer_id,
            warehouse_id,
            address,
            lines: lines
                .into_iter()
                .filter(|line| line.is_billable())
                .map(|line| OrderLine::from_cart_line(line, tax_id.cloned()))
                .collect(),
        }
    }
}

//! Cart

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    coerce::{lenient_decimal, lenient_quantity},
    ids::{CustomerId, ExternalIdError, ProductId, UomId, WarehouseId},
};

/// Prefix used for persisted cart keys.
pub const STORAGE_KEY_PREFIX: &str = "cart_";

/// Sentinel used in storage keys and on the command line for the anonymous cart.
pub const GUEST_OWNER: &str = "guest";

/// Unit of measure attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeasure {
    /// ERP unit of measure id.
    pub uom_id: UomId,

    /// Display name, e.g. "Units".
    pub uom_name: String,
}

/// One product line in an in-progress order.
///
/// `quantity` and `unit_price` deserialize permissively: missing, non-numeric
/// or negative values become zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product reference in the ERP.
    pub product_id: ProductId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Quantity; zero while a row is being edited.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,

    /// Unit price in the active currency.
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub unit_price: Decimal,

    /// Optional unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<UnitOfMeasure>,

    /// Image URI or base64 payload, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    /// Warehouse recorded for this product in the inventory ledger, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<WarehouseId>,
}

impl CartLine {
    /// Create a line with no unit of measure, image or warehouse.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            quantity,
            unit_price: unit_price.max(Decimal::ZERO),
            unit_of_measure: None,
            image_ref: None,
            warehouse_id: None,
        }
    }

    /// Attach a unit of measure.
    #[must_use]
    pub fn with_unit_of_measure(mut self, uom: UnitOfMeasure) -> Self {
        self.unit_of_measure = Some(uom);
        self
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Record the inventory ledger warehouse for this product.
    #[must_use]
    pub fn with_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }

    /// `quantity × unit_price`, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price.max(Decimal::ZERO))
    }

    /// Whether this line takes part in totals and submission.
    pub fn is_billable(&self) -> bool {
        self.quantity > 0
    }
}

/// Who a cart belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CartOwner {
    /// Anonymous point-of-sale customer.
    #[default]
    Guest,

    /// An identified ERP customer.
    Customer(CustomerId),
}

impl CartOwner {
    /// Key under which this owner's cart is persisted, `cart_<customerId>`.
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_KEY_PREFIX}{self}")
    }

    /// Returns the customer id, if identified.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        match self {
            Self::Guest => None,
            Self::Customer(id) => Some(id),
        }
    }
}

impl Display for CartOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Guest => f.write_str(GUEST_OWNER),
            Self::Customer(id) => Display::fmt(id, f),
        }
    }
}

impl FromStr for CartOwner {
    type Err = ExternalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(GUEST_OWNER) {
            return Ok(Self::Guest);
        }

        s.parse().map(Self::Customer)
    }
}

impl From<CustomerId> for CartOwner {
    fn from(value: CustomerId) -> Self {
        Self::Customer(value)
    }
}

/// An ordered collection of lines holding at most one line per product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the line for `line.product_id` in place, or append it.
    pub fn upsert(&mut self, line: CartLine) {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.product_id == line.product_id)
        {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| &line.product_id != product_id);

        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Lines with a non-zero quantity.
    pub fn billable_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| line.is_billable())
    }

    /// Find the line for a product.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the cart, returning its lines.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }
}

impl FromIterator<CartLine> for Cart {
    /// Duplicate products collapse into the position of their first occurrence,
    /// keeping the last supplied fields.
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut cart = Self::new();

        for line in iter {
            cart.upsert(line);
        }

        cart
    }
}

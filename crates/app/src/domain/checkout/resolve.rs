//! Required-field resolution.
//!
//! Each field is resolved through an ordered list of tiers. The first tier
//! that yields a value wins; the tiers are exposed individually so they can
//! be tested and recombined.

use std::sync::Arc;

use till::{
    cart::CartLine,
    ids::{CustomerId, WarehouseId},
    order::{MissingFields, RequiredField},
};
use tracing::{debug, warn};

use crate::{
    domain::checkout::models::{Customer, ResolvedFields, UserProfile},
    erp::ErpService,
};

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn resolve_customer_id(customer: &Customer) -> Result<CustomerId, RequiredField> {
    customer.id.clone().ok_or(RequiredField::CustomerId)
}

/// The warehouse assigned to the acting user.
pub fn warehouse_from_user(user: &UserProfile) -> Option<WarehouseId> {
    user.warehouse_id.clone()
}

/// The inventory ledger warehouse recorded on the first cart line.
pub fn warehouse_from_ledger(lines: &[CartLine]) -> Option<WarehouseId> {
    lines.first().and_then(|line| line.warehouse_id.clone())
}

pub fn resolve_warehouse_id(
    user: &UserProfile,
    lines: &[CartLine],
    fallback: Option<&WarehouseId>,
) -> Result<WarehouseId, RequiredField> {
    warehouse_from_user(user)
        .or_else(|| warehouse_from_ledger(lines))
        .or_else(|| {
            let fallback = fallback.cloned();

            if let Some(warehouse) = &fallback {
                debug!(%warehouse, "using fallback warehouse");
            }

            fallback
        })
        .ok_or(RequiredField::WarehouseId)
}

/// The address stored on the customer record.
pub fn address_from_record(customer: &Customer) -> Option<String> {
    customer.address.as_deref().and_then(non_blank)
}

/// The customer's address as currently held by the ERP.
///
/// Lookup failures are logged and treated as "no address".
pub async fn address_from_erp(erp: &dyn ErpService, customer: &CustomerId) -> Option<String> {
    match erp.partner_address(customer).await {
        Ok(address) => address.as_deref().and_then(non_blank),
        Err(error) => {
            warn!(%customer, %error, "address lookup failed");
            None
        }
    }
}

/// The customer's display name, standing in for an unknown address.
pub fn address_from_display_name(customer: &Customer) -> Option<String> {
    non_blank(&customer.display_name)
}

pub async fn resolve_address(
    customer: &Customer,
    erp: &dyn ErpService,
) -> Result<String, RequiredField> {
    if let Some(address) = address_from_record(customer) {
        return Ok(address);
    }

    if let Some(id) = &customer.id
        && let Some(address) = address_from_erp(erp, id).await
    {
        return Ok(address);
    }

    address_from_display_name(customer).ok_or(RequiredField::Address)
}

/// Runs every resolution pipeline and reports all missing fields together.
pub struct Resolver {
    erp: Arc<dyn ErpService>,
    fallback_warehouse: Option<WarehouseId>,
}

impl Resolver {
    #[must_use]
    pub fn new(erp: Arc<dyn ErpService>, fallback_warehouse: Option<WarehouseId>) -> Self {
        Self {
            erp,
            fallback_warehouse,
        }
    }

    /// Resolve customer, warehouse and address for `lines`.
    ///
    /// # Errors
    ///
    /// Returns every field that no tier could resolve.
    pub async fn resolve(
        &self,
        customer: &Customer,
        user: &UserProfile,
        lines: &[CartLine],
    ) -> Result<ResolvedFields, MissingFields> {
        let customer_id = resolve_customer_id(customer);
        let warehouse_id = resolve_warehouse_id(user, lines, self.fallback_warehouse.as_ref());
        let address = resolve_address(customer, self.erp.as_ref()).await;

        match (customer_id, warehouse_id, address) {
            (Ok(customer_id), Ok(warehouse_id), Ok(address)) => Ok(ResolvedFields {
                customer_id,
                warehouse_id,
                address,
            }),
            (customer_id, warehouse_id, address) => Err([
                customer_id.err(),
                warehouse_id.err(),
                address.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }
}

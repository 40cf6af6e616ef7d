//! Checkout errors.

use thiserror::Error;
use till::order::MissingFields;

use crate::erp::ErpError;

/// Checkout failure variants.
///
/// Every variant leaves the cart untouched.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing billable in the cart.
    #[error("cart has no billable lines")]
    EmptyCart,

    /// Required fields could not be resolved; no ERP document was created.
    #[error(transparent)]
    MissingFields(#[from] MissingFields),

    /// The ERP rejected the sale order or invoice.
    #[error("failed to submit order: {0}")]
    Submit(#[source] ErpError),
}

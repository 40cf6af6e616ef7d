//! Till Domain Concerns

pub mod carts;
pub mod checkout;

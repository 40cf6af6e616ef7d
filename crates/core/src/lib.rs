//! Till
//!
//! Cart lines, totals, order drafts and receipts for a point-of-sale front end backed by an ERP.

pub mod cart;
pub mod coerce;
pub mod ids;
pub mod order;
pub mod prelude;
pub mod receipt;
pub mod totals;

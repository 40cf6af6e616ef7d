//! Checkout

pub mod errors;
pub mod models;
pub mod resolve;
pub mod service;

pub use errors::CheckoutError;
pub use service::*;

//! Runtime configuration
//!
//! Each group is a flattened `clap` argument set with environment fallbacks,
//! so commands pull in only the settings they need.

use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

pub mod checkout;
pub mod erp;
pub mod logging;
pub mod storage;

pub use checkout::CheckoutConfig;
pub use erp::ErpConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

/// Configuration values that parsed but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Not an ISO 4217 currency code.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Load `.env` into the process environment, if present.
pub fn load_dotenv() {
    // Missing .env is fine
    _ = dotenvy::dotenv();
}

/// Look up an ISO 4217 currency code, case-insensitively.
///
/// # Errors
///
/// Returns an error when the code is not a known ISO currency.
pub fn find_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    Currency::find(&code.trim().to_uppercase())
        .ok_or_else(|| ConfigError::UnknownCurrency(code.to_string()))
}

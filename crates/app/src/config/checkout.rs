//! Checkout Config

use clap::Args;
use rusty_money::iso::Currency;
use till::ids::{TaxId, WarehouseId};

use crate::{
    config::{ConfigError, find_currency},
    domain::checkout::models::{CheckoutPolicy, DEFAULT_FALLBACK_WAREHOUSE},
};

/// Order submission settings.
#[derive(Debug, Clone, Args)]
pub struct CheckoutConfig {
    /// Warehouse used when neither the user nor the cart names one
    #[arg(
        long,
        env = "TILL_FALLBACK_WAREHOUSE",
        default_value_t = WarehouseId::from(DEFAULT_FALLBACK_WAREHOUSE)
    )]
    pub fallback_warehouse: WarehouseId,

    /// Abort instead of using the fallback warehouse
    #[arg(long, env = "TILL_NO_WAREHOUSE_FALLBACK")]
    pub no_warehouse_fallback: bool,

    /// Tax applied to every submitted line
    #[arg(long, env = "TILL_TAX_ID")]
    pub tax_id: Option<TaxId>,

    /// ISO 4217 currency used for display
    #[arg(long, env = "TILL_CURRENCY", default_value = "USD")]
    pub currency: String,
}

impl CheckoutConfig {
    #[must_use]
    pub fn policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            fallback_warehouse: (!self.no_warehouse_fallback)
                .then(|| self.fallback_warehouse.clone()),
            tax_id: self.tax_id.clone(),
        }
    }

    /// Look up the configured currency.
    ///
    /// # Errors
    ///
    /// Returns an error when the code is not a known ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        find_currency(&self.currency)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        checkout: CheckoutConfig,
    }

    #[test]
    fn defaults_use_fallback_warehouse() -> TestResult {
        let harness = Harness::try_parse_from(["till"])?;

        assert_eq!(harness.checkout.policy(), CheckoutPolicy::default());
        assert_eq!(harness.checkout.currency()?.iso_alpha_code, "USD");

        Ok(())
    }

    #[test]
    fn fallback_can_be_disabled() -> TestResult {
        let harness = Harness::try_parse_from(["till", "--no-warehouse-fallback", "--tax-id", "4"])?;
        let policy = harness.checkout.policy();

        assert_eq!(policy.fallback_warehouse, None);
        assert_eq!(policy.tax_id, Some(TaxId::from(4_i64)));

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let harness = Harness::try_parse_from(["till", "--currency", "XYZ"])?;

        assert!(matches!(
            harness.checkout.currency(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ"
        ));

        Ok(())
    }
}

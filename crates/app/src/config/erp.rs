//! ERP Config

use clap::Args;

use crate::erp::OdooConfig;

/// Odoo connection settings.
#[derive(Debug, Clone, Args)]
pub struct ErpConfig {
    /// Odoo base URL
    #[arg(long = "odoo-url", env = "ODOO_URL")]
    pub url: String,

    /// Odoo database name
    #[arg(long = "odoo-db", env = "ODOO_DB")]
    pub database: String,

    /// Odoo login
    #[arg(long = "odoo-login", env = "ODOO_LOGIN")]
    pub login: String,

    /// Odoo password or API key
    #[arg(long = "odoo-password", env = "ODOO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl From<ErpConfig> for OdooConfig {
    fn from(config: ErpConfig) -> Self {
        Self {
            url: config.url,
            database: config.database,
            login: config.login,
            password: config.password,
        }
    }
}

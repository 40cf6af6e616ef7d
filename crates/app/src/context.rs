//! Application context wiring.

use std::sync::Arc;

use crate::{
    config::{CheckoutConfig, ErpConfig, StorageConfig},
    domain::{
        carts::{CartService, CartStore},
        checkout::Checkout,
    },
    erp::{ErpError, ErpService, OdooClient, OdooErpService},
    storage::FileCartStorage,
};

/// Shared services handed to commands.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartService>,
    pub erp: Arc<dyn ErpService>,
}

impl AppContext {
    /// Carts persisted under the configured directory, backed by a live ERP.
    ///
    /// # Errors
    ///
    /// Returns an error if the ERP client cannot be constructed.
    pub fn from_config(storage: &StorageConfig, erp: ErpConfig) -> Result<Self, ErpError> {
        Ok(Self {
            carts: carts_from_config(storage),
            erp: Arc::new(OdooErpService::new(OdooClient::new(erp.into())?)),
        })
    }

    #[must_use]
    pub fn checkout(&self, config: &CheckoutConfig) -> Checkout {
        Checkout::new(self.carts.clone(), self.erp.clone(), config.policy())
    }
}

/// Carts persisted under the configured directory.
#[must_use]
pub fn carts_from_config(storage: &StorageConfig) -> Arc<dyn CartService> {
    Arc::new(CartStore::new(Arc::new(FileCartStorage::new(
        storage.cart_dir.clone(),
    ))))
}

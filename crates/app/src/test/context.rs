//! Test context for service-level tests.

use std::sync::Arc;

use testresult::TestResult;
use till::cart::{CartLine, CartOwner};

use crate::{
    domain::carts::{CartService, CartStore},
    storage::InMemoryCartStorage,
};

pub(crate) struct TestContext {
    pub storage: Arc<InMemoryCartStorage>,
    pub carts: Arc<CartStore>,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let storage = Arc::new(InMemoryCartStorage::new());
        let carts = Arc::new(CartStore::new(storage.clone()));

        Self { storage, carts }
    }

    /// A context whose active cart belongs to `owner` and holds `lines`.
    pub(crate) async fn with_cart(owner: &str, lines: Vec<CartLine>) -> TestResult<Self> {
        let ctx = Self::new();
        let owner: CartOwner = owner.parse()?;

        ctx.carts.load_customer_cart(owner.clone(), lines).await;
        ctx.carts.set_current_customer(owner).await;

        Ok(ctx)
    }
}

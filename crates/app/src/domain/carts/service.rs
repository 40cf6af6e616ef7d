//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use till::{
    cart::{Cart, CartLine, CartOwner},
    ids::ProductId,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::storage::CartStorage;

#[derive(Debug, Default)]
struct CartState {
    current: CartOwner,
    carts: FxHashMap<CartOwner, Cart>,
}

impl CartState {
    fn current_mut(&mut self) -> &mut Cart {
        self.carts.entry(self.current.clone()).or_default()
    }
}

/// Per-customer carts held in memory with best-effort persistence.
///
/// Memory is authoritative for the session: persistence failures are logged
/// and never surface to callers.
pub struct CartStore {
    storage: Arc<dyn CartStorage>,
    state: Mutex<CartState>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self {
            storage,
            state: Mutex::new(CartState::default()),
        }
    }

    async fn persist(&self, owner: &CartOwner, cart: &Cart) {
        let key = owner.storage_key();

        if let Err(error) = self.storage.save(&key, cart.lines()).await {
            warn!(%key, %error, "failed to persist cart");
        }
    }
}

#[async_trait]
impl CartService for CartStore {
    async fn set_current_customer(&self, owner: CartOwner) {
        debug!(%owner, "switching active cart");

        self.state.lock().await.current = owner;
    }

    async fn current_owner(&self) -> CartOwner {
        self.state.lock().await.current.clone()
    }

    async fn current_cart(&self) -> Vec<CartLine> {
        self.current_snapshot().await.1
    }

    async fn current_snapshot(&self) -> (CartOwner, Vec<CartLine>) {
        let state = self.state.lock().await;

        let lines = state
            .carts
            .get(&state.current)
            .map(|cart| cart.lines().to_vec())
            .unwrap_or_default();

        (state.current.clone(), lines)
    }

    async fn add_product(&self, line: CartLine) {
        let mut state = self.state.lock().await;
        let owner = state.current.clone();
        let cart = state.current_mut();

        cart.upsert(line);

        self.persist(&owner, cart).await;
    }

    async fn remove_product(&self, product_id: &ProductId) {
        let mut state = self.state.lock().await;
        let owner = state.current.clone();
        let cart = state.current_mut();

        if cart.remove(product_id) {
            self.persist(&owner, cart).await;
        }
    }

    async fn clear_products(&self) {
        let mut state = self.state.lock().await;
        let owner = state.current.clone();
        let cart = state.current_mut();

        cart.clear();

        self.persist(&owner, cart).await;
    }

    async fn clear_customer(&self, owner: CartOwner) {
        let mut state = self.state.lock().await;
        let cart = state.carts.entry(owner.clone()).or_default();

        cart.clear();

        self.persist(&owner, cart).await;
    }

    async fn load_customer_cart(&self, owner: CartOwner, lines: Vec<CartLine>) {
        let mut state = self.state.lock().await;
        let cart: Cart = lines.into_iter().collect();

        self.persist(&owner, &cart).await;

        state.carts.insert(owner, cart);
    }

    async fn restore_customer_cart(&self, owner: CartOwner) -> Vec<CartLine> {
        let key = owner.storage_key();

        let lines = match self.storage.load(&key).await {
            Ok(lines) => lines.unwrap_or_default(),
            Err(error) => {
                warn!(%key, %error, "failed to restore cart, starting empty");
                Vec::new()
            }
        };

        let cart: Cart = lines.into_iter().collect();
        let restored = cart.lines().to_vec();

        self.state.lock().await.carts.insert(owner, cart);

        restored
    }

    async fn migrate_cart(&self, from: CartOwner, to: CartOwner) -> Vec<CartLine> {
        if from == to {
            return self.restore_customer_cart(to).await;
        }

        let source = self.restore_customer_cart(from.clone()).await;
        let target = self.restore_customer_cart(to.clone()).await;

        let merged: Cart = target.into_iter().chain(source).collect();
        let lines = merged.into_lines();

        debug!(%from, %to, lines = lines.len(), "migrating cart");

        self.load_customer_cart(to, lines.clone()).await;
        self.clear_customer(from).await;

        lines
    }
}

#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Switch the active cart. Other customers' carts are kept.
    async fn set_current_customer(&self, owner: CartOwner);

    /// The owner of the active cart.
    async fn current_owner(&self) -> CartOwner;

    /// Lines of the active cart, empty if it has none yet.
    async fn current_cart(&self) -> Vec<CartLine>;

    /// The active owner together with its lines, read atomically.
    async fn current_snapshot(&self) -> (CartOwner, Vec<CartLine>);

    /// Replace the line for the same product, or append it.
    async fn add_product(&self, line: CartLine);

    /// Remove the line for `product_id`, if present.
    async fn remove_product(&self, product_id: &ProductId);

    /// Empty the active cart and persist the empty state.
    async fn clear_products(&self);

    /// Empty `owner`'s cart and persist the empty state, whichever cart is active.
    async fn clear_customer(&self, owner: CartOwner);

    /// Replace `owner`'s cart wholesale.
    async fn load_customer_cart(&self, owner: CartOwner, lines: Vec<CartLine>);

    /// Load `owner`'s persisted cart into memory. Read failures yield an empty cart.
    async fn restore_customer_cart(&self, owner: CartOwner) -> Vec<CartLine>;

    /// Move `from`'s persisted lines onto `to`'s cart and empty `from`.
    ///
    /// Lines already held by `to` are kept; a product present in both takes
    /// the line from `from`. Returns `to`'s resulting lines.
    async fn migrate_cart(&self, from: CartOwner, to: CartOwner) -> Vec<CartLine>;
}

//! Device-local cart persistence

use async_trait::async_trait;
use mockall::automock;
use till::cart::CartLine;

mod errors;
mod file;
mod memory;

pub use errors::CartStorageError;
pub use file::FileCartStorage;
pub use memory::InMemoryCartStorage;

/// Key-value persistence for carts, addressed by keys such as `cart_<customerId>`.
#[automock]
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Load the lines stored under `key`, or `None` when nothing was saved.
    async fn load(&self, key: &str) -> Result<Option<Vec<CartLine>>, CartStorageError>;

    /// Store `lines` under `key`, replacing any previous value.
    async fn save(&self, key: &str, lines: &[CartLine]) -> Result<(), CartStorageError>;
}

//! Cart storage errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("cart storage I/O failed")]
    Io(#[from] io::Error),

    #[error("stored cart is not valid JSON")]
    Serialization(#[from] serde_json::Error),
}

//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Device-local cart persistence settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding one JSON file per cart
    #[arg(long, env = "TILL_CART_DIR", default_value = ".till/carts")]
    pub cart_dir: PathBuf,
}

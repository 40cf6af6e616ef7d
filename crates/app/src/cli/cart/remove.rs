use clap::Args;
use till::ids::ProductId;

use crate::cli::{CliError, cart::CartTarget};

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    #[command(flatten)]
    target: CartTarget,

    /// Product id
    product: ProductId,
}

pub(crate) async fn run(args: RemoveArgs) -> Result<(), CliError> {
    let carts = args.target.open().await;

    carts.remove_product(&args.product).await;

    println!("cart lines: {}", carts.current_cart().await.len());

    Ok(())
}

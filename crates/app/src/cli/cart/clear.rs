use clap::Args;

use crate::cli::{CliError, cart::CartTarget};

#[derive(Debug, Args)]
pub(crate) struct ClearArgs {
    #[command(flatten)]
    target: CartTarget,
}

pub(crate) async fn run(args: ClearArgs) -> Result<(), CliError> {
    args.target.open().await.clear_products().await;

    println!("cart cleared");

    Ok(())
}

use clap::Args;
use till::{cart::CartOwner, ids::CustomerId};
use till_app::{config::StorageConfig, context::carts_from_config};

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct AssignArgs {
    /// Customer who takes over the walk-in cart
    #[arg(long)]
    customer: CustomerId,

    #[command(flatten)]
    storage: StorageConfig,
}

pub(crate) async fn run(args: AssignArgs) -> Result<(), CliError> {
    let carts = carts_from_config(&args.storage);
    let owner = CartOwner::from(args.customer);

    let lines = carts.migrate_cart(CartOwner::Guest, owner.clone()).await;

    println!("moved guest cart to {owner}, cart lines: {}", lines.len());

    Ok(())
}

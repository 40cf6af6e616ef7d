use std::sync::Arc;

use clap::{Args, Subcommand};
use till::cart::CartOwner;
use till_app::{
    config::StorageConfig,
    context::carts_from_config,
    domain::carts::CartService,
};

use crate::cli::CliError;

mod add;
mod assign;
mod clear;
mod remove;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a product, replacing any existing line for it
    Add(add::AddArgs),

    /// Remove a product's line
    Remove(remove::RemoveArgs),

    /// Print the cart with totals
    Show(show::ShowArgs),

    /// Empty the cart
    Clear(clear::ClearArgs),

    /// Move the walk-in cart onto an identified customer
    Assign(assign::AssignArgs),
}

/// Which customer's cart to operate on.
#[derive(Debug, Args)]
pub(crate) struct CartTarget {
    /// Customer id, or "guest" for the walk-in cart
    #[arg(long, default_value_t = CartOwner::Guest)]
    customer: CartOwner,

    #[command(flatten)]
    storage: StorageConfig,
}

impl CartTarget {
    /// Restore the persisted cart and make it the active one.
    pub(crate) async fn open(&self) -> Arc<dyn CartService> {
        open_cart(&self.storage, self.customer.clone()).await
    }
}

pub(crate) async fn open_cart(storage: &StorageConfig, owner: CartOwner) -> Arc<dyn CartService> {
    let carts = carts_from_config(storage);

    carts.restore_customer_cart(owner.clone()).await;
    carts.set_current_customer(owner).await;

    carts
}

pub(crate) async fn run(command: CartCommand) -> Result<(), CliError> {
    match command.command {
        CartSubcommand::Add(args) => add::run(args).await,
        CartSubcommand::Remove(args) => remove::run(args).await,
        CartSubcommand::Show(args) => show::run(args).await,
        CartSubcommand::Clear(args) => clear::run(args).await,
        CartSubcommand::Assign(args) => assign::run(args).await,
    }
}

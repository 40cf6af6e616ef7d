use std::io;

use clap::{Parser, Subcommand};
use tabled::{Table, builder::Builder, settings::Style};
use thiserror::Error;
use till::receipt::ReceiptError;
use till_app::{
    config::{ConfigError, LoggingConfig},
    domain::checkout::CheckoutError,
    erp::ErpError,
    observability::{ObservabilityError, init_logging},
};

mod cart;
mod checkout;
mod customers;
mod journals;
mod products;

#[derive(Debug, Parser)]
#[command(name = "till", about = "Till point-of-sale CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Edit and inspect a customer's cart
    Cart(cart::CartCommand),

    /// Submit a customer's cart to the ERP
    Checkout(checkout::CheckoutArgs),

    /// Look up customers
    Customers(customers::CustomersCommand),

    /// Browse the product catalogue
    Products(products::ProductsCommand),

    /// List payment journals
    Journals(journals::JournalsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), CliError> {
        init_logging(&self.logging)?;

        match self.command {
            Commands::Cart(command) => cart::run(command).await,
            Commands::Checkout(args) => checkout::run(args).await,
            Commands::Customers(command) => customers::run(command).await,
            Commands::Products(command) => products::run(command).await,
            Commands::Journals(command) => journals::run(command).await,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("ERP request failed: {0}")]
    Erp(#[from] ErpError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Render rows under `header` in the same style as receipts.
pub(crate) fn table<const N: usize>(
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
) -> Table {
    let mut builder = Builder::default();

    builder.push_record(header);

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table
}

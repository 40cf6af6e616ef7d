use std::io;

use clap::Args;
use till::receipt::Receipt;
use till_app::config::find_currency;

use crate::cli::{CliError, cart::CartTarget};

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    target: CartTarget,

    /// ISO 4217 currency used for display
    #[arg(long, env = "TILL_CURRENCY", default_value = "USD")]
    currency: String,
}

pub(crate) async fn run(args: ShowArgs) -> Result<(), CliError> {
    let currency = find_currency(&args.currency)?;
    let lines = args.target.open().await.current_cart().await;

    if lines.is_empty() {
        println!("cart is empty");

        return Ok(());
    }

    Receipt::preview(&lines, currency).write_to(&mut io::stdout().lock())?;

    Ok(())
}

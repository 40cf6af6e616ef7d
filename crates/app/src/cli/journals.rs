use clap::{Args, Subcommand};
use till_app::{
    config::ErpConfig,
    erp::{ErpService, OdooClient, OdooErpService},
};

use crate::cli::{CliError, table};

#[derive(Debug, Args)]
pub(crate) struct JournalsCommand {
    #[command(subcommand)]
    command: JournalsSubcommand,
}

#[derive(Debug, Subcommand)]
enum JournalsSubcommand {
    /// List cash and bank journals
    List(ListArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    erp: ErpConfig,
}

pub(crate) async fn run(command: JournalsCommand) -> Result<(), CliError> {
    match command.command {
        JournalsSubcommand::List(args) => list(args).await,
    }
}

async fn list(args: ListArgs) -> Result<(), CliError> {
    let erp = OdooErpService::new(OdooClient::new(args.erp.into())?);
    let journals = erp.fetch_payment_journals().await?;

    let rows = journals
        .into_iter()
        .map(|journal| [journal.id.to_string(), journal.name, journal.journal_type]);

    println!("{}", table(["ID", "Name", "Type"], rows));

    Ok(())
}

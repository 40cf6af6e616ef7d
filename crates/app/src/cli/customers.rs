use clap::{Args, Subcommand};
use till_app::{
    config::ErpConfig,
    erp::{ErpService, OdooClient, OdooErpService},
};

use crate::cli::{CliError, table};

#[derive(Debug, Args)]
pub(crate) struct CustomersCommand {
    #[command(subcommand)]
    command: CustomersSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomersSubcommand {
    /// Find customers by name or email
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Name or email fragment
    term: String,

    /// Maximum number of results
    #[arg(long, default_value_t = 20)]
    limit: u32,

    #[command(flatten)]
    erp: ErpConfig,
}

pub(crate) async fn run(command: CustomersCommand) -> Result<(), CliError> {
    match command.command {
        CustomersSubcommand::Search(args) => search(args).await,
    }
}

async fn search(args: SearchArgs) -> Result<(), CliError> {
    let erp = OdooErpService::new(OdooClient::new(args.erp.into())?);
    let partners = erp.search_customers(&args.term, args.limit).await?;

    let rows = partners.into_iter().map(|partner| {
        let address = partner.address().unwrap_or_default();

        [
            partner.id.to_string(),
            partner.name,
            partner.email.unwrap_or_default(),
            partner.phone.unwrap_or_default(),
            address,
        ]
    });

    println!("{}", table(["ID", "Name", "Email", "Phone", "Address"], rows));

    Ok(())
}

use clap::{Args, Subcommand};
use till_app::{
    config::ErpConfig,
    erp::{ErpService, OdooClient, OdooErpService, models::Many2One},
};

use crate::cli::{CliError, table};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List saleable products
    List(ListArgs),

    /// List product categories
    Categories(CategoriesArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Only products in this category or its children
    #[arg(long)]
    category: Option<i64>,

    /// Maximum number of results
    #[arg(long, default_value_t = 50)]
    limit: u32,

    #[command(flatten)]
    erp: ErpConfig,
}

#[derive(Debug, Args)]
pub(crate) struct CategoriesArgs {
    #[command(flatten)]
    erp: ErpConfig,
}

pub(crate) async fn run(command: ProductsCommand) -> Result<(), CliError> {
    match command.command {
        ProductsSubcommand::List(args) => list(args).await,
        ProductsSubcommand::Categories(args) => categories(args).await,
    }
}

fn name_of(reference: Option<&Many2One>) -> String {
    reference.map(Many2One::name).unwrap_or_default().to_string()
}

async fn list(args: ListArgs) -> Result<(), CliError> {
    let erp = OdooErpService::new(OdooClient::new(args.erp.into())?);
    let products = erp.fetch_products(args.category, args.limit).await?;

    let rows = products.into_iter().map(|product| {
        [
            product.id.to_string(),
            product.default_code.unwrap_or_default(),
            product.display_name,
            product.list_price.to_string(),
            name_of(product.uom_id.as_ref()),
            name_of(product.categ_id.as_ref()),
        ]
    });

    println!(
        "{}",
        table(["ID", "Code", "Name", "Price", "Unit", "Category"], rows)
    );

    Ok(())
}

async fn categories(args: CategoriesArgs) -> Result<(), CliError> {
    let erp = OdooErpService::new(OdooClient::new(args.erp.into())?);
    let categories = erp.fetch_categories().await?;

    let rows = categories.into_iter().map(|category| {
        [
            category.id.to_string(),
            category.name,
            name_of(category.parent_id.as_ref()),
        ]
    });

    println!("{}", table(["ID", "Name", "Parent"], rows));

    Ok(())
}

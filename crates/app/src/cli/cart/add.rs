use clap::Args;
use serde_json::Value;
use till::{
    cart::{CartLine, UnitOfMeasure},
    coerce::{decimal_from_value, quantity_from_value},
    ids::{ProductId, UomId, WarehouseId},
};

use crate::cli::{CliError, cart::CartTarget};

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    #[command(flatten)]
    target: CartTarget,

    /// Product id
    product: ProductId,

    /// Display name
    #[arg(long)]
    name: String,

    /// Quantity; anything that is not a non-negative number counts as 0
    #[arg(long, default_value = "1")]
    quantity: String,

    /// Unit price; anything that is not a non-negative number counts as 0
    #[arg(long)]
    price: String,

    /// Unit of measure id
    #[arg(long, requires = "uom_name")]
    uom_id: Option<UomId>,

    /// Unit of measure name
    #[arg(long, requires = "uom_id")]
    uom_name: Option<String>,

    /// Image URI or base64 payload
    #[arg(long)]
    image: Option<String>,

    /// Warehouse whose stock ledger holds the product
    #[arg(long)]
    warehouse: Option<WarehouseId>,
}

pub(crate) async fn run(args: AddArgs) -> Result<(), CliError> {
    let carts = args.target.open().await;

    let mut line = CartLine::new(
        args.product,
        args.name,
        quantity_from_value(&Value::String(args.quantity)),
        decimal_from_value(&Value::String(args.price)),
    );

    if let (Some(uom_id), Some(uom_name)) = (args.uom_id, args.uom_name) {
        line = line.with_unit_of_measure(UnitOfMeasure { uom_id, uom_name });
    }

    if let Some(image) = args.image {
        line = line.with_image_ref(image);
    }

    if let Some(warehouse) = args.warehouse {
        line = line.with_warehouse(warehouse);
    }

    println!(
        "added {} x {} @ {}",
        line.quantity, line.product_id, line.unit_price
    );

    carts.add_product(line).await;

    println!("cart lines: {}", carts.current_cart().await.len());

    Ok(())
}

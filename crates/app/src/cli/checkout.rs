use std::io::{self, Write};

use clap::Args;
use till::{
    cart::CartOwner,
    ids::{CustomerId, PosOrderId, WarehouseId},
};
use till_app::{
    config::{CheckoutConfig, ErpConfig, StorageConfig},
    context::AppContext,
    domain::checkout::models::{
        CheckoutKind, CheckoutRequest, Customer, ReconciliationIssue, UserProfile,
    },
};

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer id
    #[arg(long)]
    customer: CustomerId,

    /// Create an invoice directly instead of a sale order
    #[arg(long)]
    invoice: bool,

    /// POS order to attach the invoice to
    #[arg(long, requires = "invoice")]
    pos_order: Option<PosOrderId>,

    /// Warehouse assigned to the acting user
    #[arg(long, env = "TILL_USER_WAREHOUSE")]
    user_warehouse: Option<WarehouseId>,

    #[command(flatten)]
    erp: ErpConfig,

    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    checkout: CheckoutConfig,
}

pub(crate) async fn run(args: CheckoutArgs) -> Result<(), CliError> {
    let currency = args.checkout.currency()?;
    let ctx = AppContext::from_config(&args.storage, args.erp)?;
    let owner = CartOwner::from(args.customer.clone());

    ctx.carts.restore_customer_cart(owner.clone()).await;
    ctx.carts.set_current_customer(owner).await;

    let customer = Customer::from(ctx.erp.find_customer(&args.customer).await?);

    let kind = if args.invoice {
        CheckoutKind::DirectInvoice {
            pos_order: args.pos_order,
        }
    } else {
        CheckoutKind::SaleOrder
    };

    let completed = ctx
        .checkout(&args.checkout)
        .submit(CheckoutRequest {
            customer,
            user: UserProfile {
                warehouse_id: args.user_warehouse,
            },
            kind,
        })
        .await?;

    let mut out = io::stdout().lock();

    completed.receipt(currency).write_to(&mut out)?;

    for issue in &completed.reconciliation {
        match issue {
            ReconciliationIssue::UnconfirmedSaleOrder { order, reason } => {
                writeln!(out, "warning: sale order {order} is not confirmed: {reason}")?;
            }
            ReconciliationIssue::UnlinkedInvoice {
                invoice,
                pos_order,
                reason,
            } => {
                writeln!(
                    out,
                    "warning: invoice {invoice} is not linked to POS order {pos_order}: {reason}"
                )?;
            }
        }
    }

    Ok(())
}

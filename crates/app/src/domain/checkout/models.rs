//! Checkout Models

use rusty_money::iso::Currency;
use till::{
    cart::CartLine,
    ids::{CustomerId, InvoiceId, PosOrderId, SaleOrderId, TaxId, WarehouseId},
    order::OrderDraft,
    receipt::Receipt,
    totals::Totals,
};

use crate::erp::models::Partner;

/// Warehouse used when neither the acting user nor the cart names one.
pub const DEFAULT_FALLBACK_WAREHOUSE: i64 = 1;

/// The customer an order is placed for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub display_name: String,
    pub address: Option<String>,
}

impl From<Partner> for Customer {
    fn from(partner: Partner) -> Self {
        let address = partner.address();

        Self {
            id: Some(CustomerId::from(partner.id)),
            display_name: partner.name,
            address,
        }
    }
}

/// The acting POS user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub warehouse_id: Option<WarehouseId>,
}

/// Site-specific knobs for order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Last-resort warehouse. `None` makes an unresolved warehouse abort the checkout.
    pub fallback_warehouse: Option<WarehouseId>,

    /// Tax attached to every submitted line.
    pub tax_id: Option<TaxId>,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            fallback_warehouse: Some(WarehouseId::from(DEFAULT_FALLBACK_WAREHOUSE)),
            tax_id: None,
        }
    }
}

/// Which ERP document a checkout produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutKind {
    /// Quotation, then confirmation.
    SaleOrder,

    /// Invoice without a sale order, optionally linked back to a POS order.
    DirectInvoice { pos_order: Option<PosOrderId> },
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer: Customer,
    pub user: UserProfile,
    pub kind: CheckoutKind,
}

/// Customer, warehouse and address after every fallback tier has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub customer_id: CustomerId,
    pub warehouse_id: WarehouseId,
    pub address: String,
}

/// The document the ERP accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedDocument {
    SaleOrder(SaleOrderId),
    Invoice(InvoiceId),
}

impl SubmittedDocument {
    /// Human-readable reference, used on receipts.
    pub fn reference(&self) -> String {
        match self {
            Self::SaleOrder(id) => format!("sale.order/{id}"),
            Self::Invoice(id) => format!("account.move/{id}"),
        }
    }
}

/// A follow-up step that failed after the document was accepted.
///
/// The checkout still completes; these need manual reconciliation in the ERP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationIssue {
    /// The quotation was created but never confirmed.
    UnconfirmedSaleOrder { order: SaleOrderId, reason: String },

    /// The invoice exists but is not attached to its POS order.
    UnlinkedInvoice {
        invoice: InvoiceId,
        pos_order: PosOrderId,
        reason: String,
    },
}

/// A successful checkout.
#[derive(Debug, Clone)]
pub struct Completed {
    pub document: SubmittedDocument,
    pub draft: OrderDraft,
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub reconciliation: Vec<ReconciliationIssue>,
}

impl Completed {
    /// Whether every follow-up step succeeded.
    pub fn is_reconciled(&self) -> bool {
        self.reconciliation.is_empty()
    }

    pub fn receipt(&self, currency: &'static Currency) -> Receipt {
        Receipt::new(&self.lines, currency).with_reference(self.document.reference())
    }
}

//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, CartOwner, UnitOfMeasure},
    ids::{
        CustomerId, ExternalId, ExternalIdError, InvoiceId, PosOrderId, ProductId, SaleOrderId,
        TaxId, TypedId, UomId, WarehouseId,
    },
    order::{MissingFields, OrderDraft, OrderLine, RequiredField},
    receipt::{Receipt, ReceiptError},
    totals::{TAX_RATE, Totals, compute_totals},
};

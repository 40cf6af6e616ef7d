//! ERP service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use till::{
    ids::{CustomerId, InvoiceId, PosOrderId, SaleOrderId, TypedId},
    order::{OrderDraft, OrderLine},
};

use crate::erp::{
    ErpError, OdooClient,
    models::{
        Category, FieldDescription, Partner, PaymentJournal, ProductSummary, SelectionOption,
    },
};

const SALE_ORDER: &str = "sale.order";
const ACCOUNT_MOVE: &str = "account.move";
const POS_ORDER: &str = "pos.order";
const PARTNER: &str = "res.partner";
const PRODUCT: &str = "product.product";
const TAX: &str = "account.tax";
const WAREHOUSE: &str = "stock.warehouse";

/// Odoo one2many "create" command.
const CREATE: i64 = 0;

/// Odoo many2many "replace all" command.
const REPLACE: i64 = 6;

#[derive(Debug)]
pub struct OdooErpService {
    client: OdooClient,
}

impl OdooErpService {
    #[must_use]
    pub fn new(client: OdooClient) -> Self {
        Self { client }
    }

    async fn read_partner(&self, customer: &CustomerId) -> Result<Partner, ErpError> {
        let partners: Vec<Partner> = self
            .client
            .call_kw(
                PARTNER,
                "read",
                json!([[record_id(PARTNER, customer)?]]),
                json!({ "fields": Partner::FIELDS }),
            )
            .await?;

        partners.into_iter().next().ok_or_else(|| ErpError::NotFound {
            model: PARTNER,
            id: customer.to_string(),
        })
    }
}

#[async_trait]
impl ErpService for OdooErpService {
    async fn create_sale_order(&self, draft: &OrderDraft) -> Result<SaleOrderId, ErpError> {
        let id: i64 = self
            .client
            .call_kw(SALE_ORDER, "create", json!([sale_order_values(draft)?]), json!({}))
            .await?;

        Ok(SaleOrderId::from(id))
    }

    async fn confirm_sale_order(&self, order: &SaleOrderId) -> Result<(), ErpError> {
        let order = record_id(SALE_ORDER, order)?;

        let _: Value = self
            .client
            .call_kw(SALE_ORDER, "action_confirm", json!([[order]]), json!({}))
            .await?;

        Ok(())
    }

    async fn create_invoice(&self, draft: &OrderDraft) -> Result<InvoiceId, ErpError> {
        let id: i64 = self
            .client
            .call_kw(ACCOUNT_MOVE, "create", json!([invoice_values(draft)?]), json!({}))
            .await?;

        Ok(InvoiceId::from(id))
    }

    async fn selection_values(
        &self,
        model: &str,
        field: &str,
    ) -> Result<Vec<SelectionOption>, ErpError> {
        let mut fields: FxHashMap<String, FieldDescription> = self
            .client
            .call_kw(
                model,
                "fields_get",
                json!([[field]]),
                json!({ "attributes": ["selection"] }),
            )
            .await?;

        let description = fields.remove(field).ok_or_else(|| {
            ErpError::UnexpectedResponse(format!("{model} has no field {field}"))
        })?;

        Ok(description
            .selection
            .into_iter()
            .map(SelectionOption::from)
            .collect())
    }

    async fn link_invoice_to_pos_order(
        &self,
        pos_order: &PosOrderId,
        invoice: &InvoiceId,
        state: &str,
    ) -> Result<(), ErpError> {
        let values = json!({
            "account_move": record_id(ACCOUNT_MOVE, invoice)?,
            "state": state,
        });

        let written: bool = self
            .client
            .call_kw(
                POS_ORDER,
                "write",
                json!([[record_id(POS_ORDER, pos_order)?], values]),
                json!({}),
            )
            .await?;

        if !written {
            return Err(ErpError::UnexpectedResponse(format!(
                "{POS_ORDER} {pos_order} was not updated"
            )));
        }

        Ok(())
    }

    async fn partner_address(&self, customer: &CustomerId) -> Result<Option<String>, ErpError> {
        Ok(self.read_partner(customer).await?.address())
    }

    async fn find_customer(&self, customer: &CustomerId) -> Result<Partner, ErpError> {
        self.read_partner(customer).await
    }

    async fn search_customers(&self, term: &str, limit: u32) -> Result<Vec<Partner>, ErpError> {
        self.client
            .call_kw(
                PARTNER,
                "search_read",
                json!([["|", ["name", "ilike", term], ["email", "ilike", term]]]),
                json!({ "fields": Partner::FIELDS, "limit": limit, "order": "name" }),
            )
            .await
    }

    async fn fetch_products(
        &self,
        category: Option<i64>,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, ErpError> {
        let mut domain = vec![json!(["sale_ok", "=", true])];

        if let Some(category) = category {
            domain.push(json!(["categ_id", "child_of", category]));
        }

        self.client
            .call_kw(
                PRODUCT,
                "search_read",
                json!([domain]),
                json!({ "fields": ProductSummary::FIELDS, "limit": limit, "order": "display_name" }),
            )
            .await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ErpError> {
        self.client
            .call_kw(
                "product.category",
                "search_read",
                json!([[]]),
                json!({ "fields": ["id", "name", "parent_id"], "order": "complete_name" }),
            )
            .await
    }

    async fn fetch_payment_journals(&self) -> Result<Vec<PaymentJournal>, ErpError> {
        self.client
            .call_kw(
                "account.journal",
                "search_read",
                json!([[["type", "in", ["cash", "bank"]]]]),
                json!({ "fields": ["id", "name", "type"] }),
            )
            .await
    }
}

/// Odoo record id for `id`. Many2one values must be integers.
fn record_id<T>(model: &'static str, id: &TypedId<T>) -> Result<i64, ErpError> {
    id.as_i64().ok_or_else(|| ErpError::NonNumericId {
        model,
        id: id.to_string(),
    })
}

/// Odoo float fields take JSON numbers, not `Decimal`'s default string form.
fn price(value: &Decimal) -> Result<Value, ErpError> {
    rust_decimal::serde::float::serialize(value, serde_json::value::Serializer)
        .map_err(ErpError::Encode)
}

fn line_values(
    line: &OrderLine,
    quantity_field: &str,
    tax_field: &str,
) -> Result<Value, ErpError> {
    let mut values = json!({
        "product_id": record_id(PRODUCT, &line.product_id)?,
        quantity_field: line.quantity,
        "price_unit": price(&line.price_unit)?,
    });

    if let (Some(tax), Some(map)) = (&line.tax_id, values.as_object_mut()) {
        map.insert(
            tax_field.to_string(),
            json!([[REPLACE, 0, [record_id(TAX, tax)?]]]),
        );
    }

    Ok(values)
}

fn create_commands(
    lines: &[OrderLine],
    quantity_field: &str,
    tax_field: &str,
) -> Result<Vec<Value>, ErpError> {
    lines
        .iter()
        .map(|line| line_values(line, quantity_field, tax_field).map(create_command))
        .collect()
}

/// `sale.order` create values. The delivery address travels in the order note.
fn sale_order_values(draft: &OrderDraft) -> Result<Value, ErpError> {
    Ok(json!({
        "partner_id": record_id(PARTNER, &draft.customer_id)?,
        "warehouse_id": record_id(WAREHOUSE, &draft.warehouse_id)?,
        "note": draft.address,
        "order_line": create_commands(&draft.lines, "product_uom_qty", "tax_id")?,
    }))
}

/// `account.move` create values for a customer invoice.
fn invoice_values(draft: &OrderDraft) -> Result<Value, ErpError> {
    Ok(json!({
        "move_type": "out_invoice",
        "partner_id": record_id(PARTNER, &draft.customer_id)?,
        "narration": draft.address,
        "invoice_line_ids": create_commands(&draft.lines, "quantity", "tax_ids")?,
    }))
}

fn create_command(values: Value) -> Value {
    json!([CREATE, 0, values])
}

#[automock]
#[async_trait]
pub trait ErpService: Send + Sync {
    /// Create a quotation from a resolved draft.
    async fn create_sale_order(&self, draft: &OrderDraft) -> Result<SaleOrderId, ErpError>;

    /// Confirm a quotation into a sale order.
    async fn confirm_sale_order(&self, order: &SaleOrderId) -> Result<(), ErpError>;

    /// Create a customer invoice directly, without a sale order.
    async fn create_invoice(&self, draft: &OrderDraft) -> Result<InvoiceId, ErpError>;

    /// Allowed values of a selection field.
    async fn selection_values(
        &self,
        model: &str,
        field: &str,
    ) -> Result<Vec<SelectionOption>, ErpError>;

    /// Attach an invoice to the POS order it was raised for and set the order's state.
    async fn link_invoice_to_pos_order(
        &self,
        pos_order: &PosOrderId,
        invoice: &InvoiceId,
        state: &str,
    ) -> Result<(), ErpError>;

    /// The customer's postal address as recorded in the ERP.
    async fn partner_address(&self, customer: &CustomerId) -> Result<Option<String>, ErpError>;

    /// Read a single customer.
    async fn find_customer(&self, customer: &CustomerId) -> Result<Partner, ErpError>;

    /// Customers whose name or email matches `term`.
    async fn search_customers(&self, term: &str, limit: u32) -> Result<Vec<Partner>, ErpError>;

    /// Saleable products, optionally restricted to a category subtree.
    async fn fetch_products(
        &self,
        category: Option<i64>,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, ErpError>;

    /// All product categories.
    async fn fetch_categories(&self) -> Result<Vec<Category>, ErpError>;

    /// Cash and bank journals usable for payments.
    async fn fetch_payment_journals(&self) -> Result<Vec<PaymentJournal>, ErpError>;
}

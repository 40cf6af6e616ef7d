//! Checkout service.

use std::sync::Arc;

use till::{
    ids::{InvoiceId, PosOrderId, SaleOrderId, TaxId},
    order::OrderDraft,
    totals::compute_totals,
};
use tracing::{Span, info, warn};

use crate::{
    domain::{
        carts::CartService,
        checkout::{
            errors::CheckoutError,
            models::{
                CheckoutKind, CheckoutPolicy, CheckoutRequest, Completed, ReconciliationIssue,
                SubmittedDocument,
            },
            resolve::Resolver,
        },
    },
    erp::{ErpService, models::SelectionOption},
};

/// Model and field holding a POS order's status.
const POS_ORDER_STATE: (&str, &str) = ("pos.order", "state");

/// Pick the state a POS order moves to once its invoice is attached.
pub fn choose_link_state(options: &[SelectionOption]) -> &'static str {
    if options.iter().any(|option| option.value == "done") {
        "done"
    } else {
        "invoiced"
    }
}

/// Turns the active cart into an ERP document.
pub struct Checkout {
    carts: Arc<dyn CartService>,
    erp: Arc<dyn ErpService>,
    resolver: Resolver,
    tax_id: Option<TaxId>,
}

impl Checkout {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartService>,
        erp: Arc<dyn ErpService>,
        policy: CheckoutPolicy,
    ) -> Self {
        Self {
            carts,
            resolver: Resolver::new(erp.clone(), policy.fallback_warehouse),
            erp,
            tax_id: policy.tax_id,
        }
    }

    /// Submit the active cart.
    ///
    /// Confirmation and invoice linking are best effort: their failures are
    /// returned in [`Completed::reconciliation`] rather than as errors. The
    /// submitted customer's cart is cleared only once the ERP has accepted the
    /// document, even if another cart became active in the meantime.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart is empty, a required field cannot be
    /// resolved, or the ERP rejects the document.
    #[tracing::instrument(
        name = "checkout.service.submit",
        skip(self, request),
        fields(
            customer = tracing::field::Empty,
            document = tracing::field::Empty,
        ),
        err
    )]
    pub async fn submit(&self, request: CheckoutRequest) -> Result<Completed, CheckoutError> {
        let (owner, lines) = self.carts.current_snapshot().await;

        if !lines.iter().any(|line| line.is_billable()) {
            return Err(CheckoutError::EmptyCart);
        }

        let fields = self
            .resolver
            .resolve(&request.customer, &request.user, &lines)
            .await?;

        let span = Span::current();

        span.record("customer", tracing::field::display(&fields.customer_id));

        let draft = OrderDraft::new(
            fields.customer_id,
            fields.warehouse_id,
            fields.address,
            &lines,
            self.tax_id.as_ref(),
        );

        let (document, reconciliation) = match request.kind {
            CheckoutKind::SaleOrder => {
                let order = self
                    .erp
                    .create_sale_order(&draft)
                    .await
                    .map_err(CheckoutError::Submit)?;

                info!(%order, "created sale order");

                let issues = self.confirm(&order).await.into_iter().collect();

                (SubmittedDocument::SaleOrder(order), issues)
            }
            CheckoutKind::DirectInvoice { pos_order } => {
                let invoice = self
                    .erp
                    .create_invoice(&draft)
                    .await
                    .map_err(CheckoutError::Submit)?;

                info!(%invoice, "created invoice");

                let issues = match &pos_order {
                    Some(pos_order) => self.link(pos_order, &invoice).await.into_iter().collect(),
                    None => Vec::new(),
                };

                (SubmittedDocument::Invoice(invoice), issues)
            }
        };

        span.record("document", tracing::field::display(document.reference()));

        self.carts.clear_customer(owner).await;

        let totals = compute_totals(&lines);

        Ok(Completed {
            document,
            draft,
            lines,
            totals,
            reconciliation,
        })
    }

    async fn confirm(&self, order: &SaleOrderId) -> Option<ReconciliationIssue> {
        match self.erp.confirm_sale_order(order).await {
            Ok(()) => None,
            Err(error) => {
                warn!(%order, %error, "sale order left unconfirmed");

                Some(ReconciliationIssue::UnconfirmedSaleOrder {
                    order: order.clone(),
                    reason: error.to_string(),
                })
            }
        }
    }

    async fn link(
        &self,
        pos_order: &PosOrderId,
        invoice: &InvoiceId,
    ) -> Option<ReconciliationIssue> {
        let (model, field) = POS_ORDER_STATE;

        let state = match self.erp.selection_values(model, field).await {
            Ok(options) => choose_link_state(&options),
            Err(error) => {
                warn!(%error, "could not read POS order states");
                choose_link_state(&[])
            }
        };

        match self
            .erp
            .link_invoice_to_pos_order(pos_order, invoice, state)
            .await
        {
            Ok(()) => {
                info!(%pos_order, %invoice, state, "linked invoice to POS order");
                None
            }
            Err(error) => {
                warn!(%pos_order, %invoice, %error, "invoice left unlinked");

                Some(ReconciliationIssue::UnlinkedInvoice {
                    invoice: invoice.clone(),
                    pos_order: pos_order.clone(),
                    reason: error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;
    use till::{
        cart::{CartLine, CartOwner},
        ids::WarehouseId,
        order::RequiredField,
    };
    use tokio::{runtime::Handle, task};

    use crate::{
        domain::checkout::models::{Customer, UserProfile},
        erp::{ErpError, MockErpService},
        storage::CartStorage,
        test::{TestContext, customer, line},
    };

    use super::*;

    fn sale_order_request(customer: Customer) -> CheckoutRequest {
        CheckoutRequest {
            customer,
            user: UserProfile::default(),
            kind: CheckoutKind::SaleOrder,
        }
    }

    fn rpc_error() -> ErpError {
        ErpError::Rpc {
            code: 200,
            message: "Odoo Server Error".to_string(),
            detail: None,
        }
    }

    #[test]
    fn link_state_prefers_done() {
        let options = |values: &[&str]| -> Vec<SelectionOption> {
            values
                .iter()
                .map(|value| SelectionOption {
                    value: (*value).to_string(),
                    label: value.to_uppercase(),
                })
                .collect()
        };

        assert_eq!(choose_link_state(&options(&["draft", "invoiced", "done"])), "done");
        assert_eq!(choose_link_state(&options(&["draft", "invoiced"])), "invoiced");
        assert_eq!(choose_link_state(&[]), "invoiced");
    }

    #[tokio::test]
    async fn submits_resolved_sale_order_and_clears_cart() -> TestResult {
        let lines = vec![CartLine::new("p1".parse()?, "Pens", 3, Decimal::new(25, 1))];
        let ctx = TestContext::with_cart("c1", lines).await?;
        let mut erp = MockErpService::new();

        erp.expect_create_sale_order()
            .withf(|draft| {
                serde_json::to_value(draft).ok()
                    == Some(json!({
                        "customer_id": "c1",
                        "warehouse_id": "w1",
                        "address": "123 Main St",
                        "lines": [{"product_id": "p1", "quantity": 3, "price_unit": 2.5}]
                    }))
            })
            .times(1)
            .returning(|_| Ok(SaleOrderId::from(41_i64)));

        erp.expect_confirm_sale_order().times(1).returning(|_| Ok(()));

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let completed = checkout
            .submit(CheckoutRequest {
                customer: Customer {
                    address: Some("123 Main St".to_string()),
                    ..customer("c1", "Alice")?
                },
                user: UserProfile {
                    warehouse_id: Some("w1".parse()?),
                },
                kind: CheckoutKind::SaleOrder,
            })
            .await?;

        assert_eq!(completed.document, SubmittedDocument::SaleOrder(41_i64.into()));
        assert!(completed.is_reconciled());
        assert_eq!(completed.totals.total_amount, Decimal::new(7875, 3));
        assert!(ctx.carts.current_cart().await.is_empty());
        assert_eq!(ctx.storage.raw("cart_c1").await.as_deref(), Some("[]"));

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn switching_customer_mid_submission_clears_the_submitted_cart() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 2, 5)?]).await?;
        ctx.carts
            .load_customer_cart("c2".parse()?, vec![line("p9", 1, 1)?])
            .await;

        let carts = ctx.carts.clone();
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_sale_order().times(1).returning(move |_| {
            let carts = carts.clone();

            task::block_in_place(move || {
                Handle::current().block_on(async move {
                    if let Ok(owner) = "c2".parse::<CartOwner>() {
                        carts.set_current_customer(owner).await;
                    }
                })
            });

            Ok(SaleOrderId::from(1_i64))
        });
        erp.expect_confirm_sale_order().returning(|_| Ok(()));

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let completed = checkout
            .submit(sale_order_request(customer("c1", "Alice")?))
            .await?;

        assert_eq!(completed.lines, vec![line("p1", 2, 5)?]);
        assert_eq!(ctx.carts.current_owner().await, "c2".parse::<CartOwner>()?);
        assert_eq!(ctx.carts.current_cart().await, vec![line("p9", 1, 1)?]);
        assert_eq!(ctx.storage.raw("cart_c1").await.as_deref(), Some("[]"));
        assert_eq!(ctx.storage.load("cart_c2").await?, Some(vec![line("p9", 1, 1)?]));

        ctx.carts.set_current_customer("c1".parse()?).await;

        assert!(ctx.carts.current_cart().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn display_name_stands_in_for_missing_address() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 1, 5)?]).await?;
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_sale_order()
            .withf(|draft| draft.address == "Alice" && draft.warehouse_id == WarehouseId::from(1_i64))
            .returning(|_| Ok(SaleOrderId::from(1_i64)));
        erp.expect_confirm_sale_order().returning(|_| Ok(()));

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        checkout
            .submit(sale_order_request(customer("c1", "Alice")?))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn unresolved_address_aborts_before_submission() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 1, 5)?]).await?;
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_sale_order().never();

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let result = checkout
            .submit(sale_order_request(customer("c1", "")?))
            .await;

        match result {
            Err(CheckoutError::MissingFields(missing)) => {
                assert_eq!(missing.fields(), [RequiredField::Address]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }

        assert_eq!(ctx.carts.current_cart().await.len(), 1);
        assert_eq!(ctx.storage.load("cart_c1").await?.map(|l| l.len()), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 0, 5)?]).await?;
        let checkout = Checkout::new(
            ctx.carts.clone(),
            Arc::new(MockErpService::new()),
            CheckoutPolicy::default(),
        );

        let result = checkout
            .submit(sale_order_request(customer("c1", "Alice")?))
            .await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[tokio::test]
    async fn failed_submission_keeps_cart() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 2, 5)?]).await?;
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_sale_order().returning(|_| Err(rpc_error()));
        erp.expect_confirm_sale_order().never();

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let result = checkout
            .submit(sale_order_request(customer("c1", "Alice")?))
            .await;

        assert!(matches!(result, Err(CheckoutError::Submit(_))));
        assert_eq!(ctx.carts.current_cart().await, vec![line("p1", 2, 5)?]);

        Ok(())
    }

    #[tokio::test]
    async fn failed_confirmation_completes_with_reconciliation_issue() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 2, 5)?]).await?;
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_sale_order()
            .returning(|_| Ok(SaleOrderId::from(7_i64)));
        erp.expect_confirm_sale_order().returning(|_| Err(rpc_error()));

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let completed = checkout
            .submit(sale_order_request(customer("c1", "Alice")?))
            .await?;

        assert!(matches!(
            completed.reconciliation.as_slice(),
            [ReconciliationIssue::UnconfirmedSaleOrder { order, .. }] if *order == SaleOrderId::from(7_i64)
        ));
        assert!(ctx.carts.current_cart().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn invoice_is_linked_with_preferred_state() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 2, 5)?]).await?;
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_invoice()
            .returning(|_| Ok(InvoiceId::from(90_i64)));
        erp.expect_selection_values()
            .withf(|model, field| model == "pos.order" && field == "state")
            .returning(|_, _| {
                Ok(vec![
                    SelectionOption::from(("paid".to_string(), "Paid".to_string())),
                    SelectionOption::from(("done".to_string(), "Posted".to_string())),
                ])
            });
        erp.expect_link_invoice_to_pos_order()
            .withf(|pos_order, invoice, state| {
                *pos_order == PosOrderId::from(12_i64)
                    && *invoice == InvoiceId::from(90_i64)
                    && state == "done"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let completed = checkout
            .submit(CheckoutRequest {
                customer: customer("c1", "Alice")?,
                user: UserProfile::default(),
                kind: CheckoutKind::DirectInvoice {
                    pos_order: Some(12_i64.into()),
                },
            })
            .await?;

        assert_eq!(completed.document, SubmittedDocument::Invoice(90_i64.into()));
        assert!(completed.is_reconciled());

        Ok(())
    }

    #[tokio::test]
    async fn failed_link_completes_with_reconciliation_issue() -> TestResult {
        let ctx = TestContext::with_cart("c1", vec![line("p1", 2, 5)?]).await?;
        let mut erp = MockErpService::new();

        erp.expect_partner_address().returning(|_| Ok(None));
        erp.expect_create_invoice()
            .returning(|_| Ok(InvoiceId::from(90_i64)));
        erp.expect_selection_values()
            .returning(|_, _| Err(rpc_error()));
        erp.expect_link_invoice_to_pos_order()
            .withf(|_, _, state| state == "invoiced")
            .returning(|_, _, _| Err(rpc_error()));

        let checkout = Checkout::new(ctx.carts.clone(), Arc::new(erp), CheckoutPolicy::default());

        let completed = checkout
            .submit(CheckoutRequest {
                customer: customer("c1", "Alice")?,
                user: UserProfile::default(),
                kind: CheckoutKind::DirectInvoice {
                    pos_order: Some(12_i64.into()),
                },
            })
            .await?;

        assert_eq!(completed.reconciliation.len(), 1);
        assert!(ctx.carts.current_cart().await.is_empty());

        Ok(())
    }
}

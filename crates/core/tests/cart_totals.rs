//! Integration tests for cart bookkeeping, totals and order drafts

use rust_decimal::Decimal;
use serde_json::json;
use testresult::TestResult;

use till::prelude::*;

fn line(product: &str, quantity: u32, price: Decimal) -> TestResult<CartLine> {
    Ok(CartLine::new(product.parse()?, product.to_uppercase(), quantity, price))
}

#[test]
fn editing_a_line_then_totalling_uses_latest_fields() -> TestResult {
    let mut cart = Cart::new();

    cart.upsert(line("p1", 1, Decimal::from(10))?);
    cart.upsert(line("p2", 1, Decimal::from(5))?);
    cart.upsert(line("p1", 2, Decimal::from(10))?);

    let totals = compute_totals(cart.lines());

    assert_eq!(cart.len(), 2);
    assert_eq!(totals.untaxed_amount, Decimal::from(25));
    assert_eq!(totals.taxed_amount, Decimal::new(125, 2));
    assert_eq!(totals.total_amount, Decimal::new(2625, 2));

    Ok(())
}

#[test]
fn persisted_json_round_trips_through_a_cart() -> TestResult {
    let persisted = json!([
        {"productId": "p1", "name": "Pens", "quantity": 3, "unitPrice": 2.5},
        {"productId": 44, "name": "Ink", "quantity": "abc", "unitPrice": "7"}
    ]);

    let lines: Vec<CartLine> = serde_json::from_value(persisted)?;
    let cart: Cart = lines.into_iter().collect();

    let draft = OrderDraft::new(
        "c1".parse()?,
        "w1".parse()?,
        "123 Main St".to_string(),
        cart.lines(),
        None,
    );

    assert_eq!(draft.lines.len(), 1);
    assert_eq!(
        draft.lines.first().map(|l| (l.quantity, l.price_unit)),
        Some((3, Decimal::new(25, 1)))
    );
    assert_eq!(compute_totals(cart.lines()).untaxed_amount, Decimal::new(75, 1));

    Ok(())
}

#[test]
fn owners_isolate_storage_keys() -> TestResult {
    let first: CartOwner = "c1".parse()?;
    let second: CartOwner = "42".parse()?;

    assert_ne!(first.storage_key(), second.storage_key());
    assert_eq!(second.customer_id().and_then(TypedId::as_i64), Some(42));

    Ok(())
}

//! Test Helpers

use rust_decimal::Decimal;
use testresult::TestResult;
use till::cart::CartLine;

use crate::domain::checkout::models::Customer;

/// A cart line for `product` with a whole-unit price.
pub(crate) fn line(product: &str, quantity: u32, price: i64) -> TestResult<CartLine> {
    Ok(CartLine::new(
        product.parse()?,
        format!("Product {product}"),
        quantity,
        Decimal::from(price),
    ))
}

/// A customer with no address on record.
pub(crate) fn customer(id: &str, display_name: &str) -> TestResult<Customer> {
    Ok(Customer {
        id: Some(id.parse()?),
        display_name: display_name.to_string(),
        address: None,
    })
}

//! Totals

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use crate::cart::CartLine;

/// Flat sales tax rate applied to the untaxed sum (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Derived cart totals. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// `Σ quantity × unit_price`
    pub untaxed_amount: Decimal,

    /// `untaxed_amount × TAX_RATE`
    pub taxed_amount: Decimal,

    /// `untaxed_amount + taxed_amount`
    pub total_amount: Decimal,
}

impl Totals {
    /// Express the totals as money in `currency` for display.
    pub fn in_currency(&self, currency: &'static Currency) -> MoneyTotals {
        MoneyTotals {
            untaxed: Money::from_decimal(self.untaxed_amount, currency),
            tax: Money::from_decimal(self.taxed_amount, currency),
            total: Money::from_decimal(self.total_amount, currency),
        }
    }
}

/// [`Totals`] as money values.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyTotals {
    /// Untaxed subtotal.
    pub untaxed: Money<'static, Currency>,

    /// Tax amount.
    pub tax: Money<'static, Currency>,

    /// Grand total.
    pub total: Money<'static, Currency>,
}

/// Compute subtotal, tax and total for a set of cart lines.
///
/// Lines with a zero quantity contribute nothing. Tax is a flat [`TAX_RATE`]
/// on the whole untaxed sum, not per line. Sums saturate at [`Decimal::MAX`]
/// instead of overflowing.
pub fn compute_totals<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Totals {
    let untaxed_amount: Decimal = lines
        .into_iter()
        .filter(|line| line.is_billable())
        .map(CartLine::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let taxed_amount = Percentage::from(TAX_RATE) * untaxed_amount;

    Totals {
        untaxed_amount,
        taxed_amount,
        total_amount: untaxed_amount.saturating_add(taxed_amount),
    }
}

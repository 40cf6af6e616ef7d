//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLine,
    totals::{TAX_RATE, Totals, compute_totals},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Printable summary of a finalized order.
#[derive(Debug, Clone)]
pub struct Receipt {
    reference: Option<String>,
    lines: Vec<CartLine>,
    totals: Totals,
    currency: &'static Currency,
}

impl Receipt {
    /// Create a receipt for the billable `lines`, computing totals.
    pub fn new(lines: &[CartLine], currency: &'static Currency) -> Self {
        let lines: Vec<CartLine> = lines.iter().filter(|l| l.is_billable()).cloned().collect();
        let totals = compute_totals(&lines);

        Self {
            reference: None,
            lines,
            totals,
            currency,
        }
    }

    /// Preview every line of an open cart, including zero-quantity lines that
    /// are still held for editing. Totals count billable lines only.
    pub fn preview(lines: &[CartLine], currency: &'static Currency) -> Self {
        Self {
            reference: None,
            lines: lines.to_vec(),
            totals: compute_totals(lines),
            currency,
        }
    }

    /// Label the receipt with an order or invoice reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// The lines printed on the receipt.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Totals printed on the receipt.
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Write the receipt as a table followed by a totals summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing to `out` fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        if let Some(reference) = &self.reference {
            writeln!(out, "{reference}")?;
        }

        let mut builder = Builder::default();

        builder.push_record(["#", "Product", "Qty", "Unit price", "Amount"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("{}", idx + 1),
                line_label(line),
                line.quantity.to_string(),
                self.money(line.unit_price).to_string(),
                self.money(line.line_total()).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}")?;

        let totals = self.totals.in_currency(self.currency);
        let tax_label = format!("Tax ({}%):", (TAX_RATE * Decimal::ONE_HUNDRED).normalize());

        let summary = [
            ("Subtotal:".to_string(), totals.untaxed.to_string()),
            (tax_label, totals.tax.to_string()),
            ("Total:".to_string(), totals.total.to_string()),
        ];

        let label_width = summary.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = summary.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in summary {
            writeln!(out, " {label:<label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }

    fn money(&self, amount: Decimal) -> Money<'static, Currency> {
        Money::from_decimal(amount, self.currency)
    }
}

fn line_label(line: &CartLine) -> String {
    match &line.unit_of_measure {
        Some(uom) => format!("{} ({})", line.name, uom.uom_name),
        None => line.name.clone(),
    }
}

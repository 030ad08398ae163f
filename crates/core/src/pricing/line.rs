use rust_decimal::Decimal;
use serde::Serialize;

use super::money::{clamp_percent, percent_of, round_currency};
use super::validation::{check_line, PricingField, ValidationError, ViolationKind};
use crate::domain::quote::LineItemInput;

/// A line item with every derived amount recomputed from its inputs.
///
/// Only [`price_line_item`] builds one, so a value of this type never carries
/// stale derived fields. `input` holds the effective inputs: percentages are
/// already clamped into `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PricedLineItem {
    index: usize,
    input: LineItemInput,
    line_subtotal: Decimal,
    line_discount_amount: Decimal,
    line_total: Decimal,
    line_tax_amount: Decimal,
    line_total_with_tax: Decimal,
}

impl PricedLineItem {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn input(&self) -> &LineItemInput {
        &self.input
    }

    pub fn line_subtotal(&self) -> Decimal {
        self.line_subtotal
    }

    pub fn line_discount_amount(&self) -> Decimal {
        self.line_discount_amount
    }

    pub fn line_total(&self) -> Decimal {
        self.line_total
    }

    pub fn line_tax_amount(&self) -> Decimal {
        self.line_tax_amount
    }

    pub fn line_total_with_tax(&self) -> Decimal {
        self.line_total_with_tax
    }

    pub(crate) fn is_reconciled(&self) -> bool {
        self.line_subtotal - self.line_discount_amount == self.line_total
            && self.line_total + self.line_tax_amount == self.line_total_with_tax
    }
}

/// Prices one row. Each derived amount is rounded to cents as soon as it is
/// computed, and later amounts build on the rounded values.
pub fn price_line_item(
    index: usize,
    input: &LineItemInput,
) -> Result<PricedLineItem, ValidationError> {
    check_line(index, input)?;

    let discount_percent = clamp_percent(input.discount_percent);
    let tax_rate = clamp_percent(input.tax_rate);
    // Percentages are clamped, so any overflow comes from the size of the amount.
    let too_large = || {
        ValidationError::line(
            index,
            PricingField::UnitPrice,
            ViolationKind::OutOfRange,
            input.unit_price,
        )
    };

    let line_subtotal =
        input.quantity.checked_mul(input.unit_price).map(round_currency).ok_or_else(too_large)?;
    let line_discount_amount =
        percent_of(line_subtotal, discount_percent).map(round_currency).ok_or_else(too_large)?;
    let line_total = line_subtotal - line_discount_amount;
    let line_tax_amount = if input.is_taxable {
        percent_of(line_total, tax_rate).map(round_currency).ok_or_else(too_large)?
    } else {
        round_currency(Decimal::ZERO)
    };
    let line_total_with_tax = line_total.checked_add(line_tax_amount).ok_or_else(too_large)?;

    Ok(PricedLineItem {
        index,
        input: LineItemInput { discount_percent, tax_rate, ..input.clone() },
        line_subtotal,
        line_discount_amount,
        line_total,
        line_tax_amount,
        line_total_with_tax,
    })
}

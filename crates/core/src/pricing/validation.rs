use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::quote::{LineItemInput, Quote, QuoteAdjustments};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingField {
    Quantity,
    UnitPrice,
    DiscountPercent,
    TaxRate,
    LineTotal,
    LineTaxAmount,
    QuoteDiscountPercent,
    ShippingAmount,
    Subtotal,
    Total,
}

impl fmt::Display for PricingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::DiscountPercent => "discount_percent",
            Self::TaxRate => "tax_rate",
            Self::LineTotal => "line_total",
            Self::LineTaxAmount => "line_tax_amount",
            Self::QuoteDiscountPercent => "quote discount_percent",
            Self::ShippingAmount => "shipping_amount",
            Self::Subtotal => "subtotal",
            Self::Total => "total",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    NotPositive,
    Negative,
    OutOfRange,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotPositive => "must be greater than zero",
            Self::Negative => "must not be negative",
            Self::OutOfRange => "is too large to price",
        };
        f.write_str(message)
    }
}

/// A rejected input. `line_index` is `None` for quote-level fields.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("{}{field} {kind} (got {value})", scope(.line_index))]
pub struct ValidationError {
    pub line_index: Option<usize>,
    pub field: PricingField,
    pub kind: ViolationKind,
    pub value: Decimal,
}

fn scope(line_index: &Option<usize>) -> String {
    match line_index {
        Some(index) => format!("line {index}: "),
        None => "quote: ".to_string(),
    }
}

impl ValidationError {
    pub fn line(index: usize, field: PricingField, kind: ViolationKind, value: Decimal) -> Self {
        Self { line_index: Some(index), field, kind, value }
    }

    pub fn quote(field: PricingField, kind: ViolationKind, value: Decimal) -> Self {
        Self { line_index: None, field, kind, value }
    }
}

/// Rejects inputs that may not reach a total. Percentages are never rejected
/// here; pricing clamps them into `[0, 100]`.
pub fn check_line(index: usize, input: &LineItemInput) -> Result<(), ValidationError> {
    match line_violations(index, input).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

pub fn check_adjustments(adjustments: &QuoteAdjustments) -> Result<(), ValidationError> {
    if adjustments.shipping_amount < Decimal::ZERO {
        return Err(ValidationError::quote(
            PricingField::ShippingAmount,
            ViolationKind::Negative,
            adjustments.shipping_amount,
        ));
    }

    Ok(())
}

/// Every violation in the quote, in row order, quote-level last. Pricing
/// stops at the first of these; editors use the full list to re-prompt.
pub fn validate_quote(quote: &Quote) -> Vec<ValidationError> {
    quote
        .lines
        .iter()
        .enumerate()
        .flat_map(|(index, line)| line_violations(index, line))
        .chain(check_adjustments(&quote.adjustments).err())
        .collect()
}

fn line_violations(index: usize, input: &LineItemInput) -> Vec<ValidationError> {
    let mut violations = Vec::new();
    if input.quantity <= Decimal::ZERO {
        violations.push(ValidationError::line(
            index,
            PricingField::Quantity,
            ViolationKind::NotPositive,
            input.quantity,
        ));
    }
    if input.unit_price < Decimal::ZERO {
        violations.push(ValidationError::line(
            index,
            PricingField::UnitPrice,
            ViolationKind::Negative,
            input.unit_price,
        ));
    }
    violations
}

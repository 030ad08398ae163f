pub mod line;
pub mod money;
pub mod validation;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::quote::{Quote, QuoteAdjustments, QuoteId};

pub use self::line::{price_line_item, PricedLineItem};
pub use self::validation::{validate_quote, PricingField, ValidationError, ViolationKind};

use self::money::{clamp_percent, percent_of, round_currency};
use self::validation::check_adjustments;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub quote_id: QuoteId,
    pub currency: String,
    pub steps: Vec<PricingTraceStep>,
}

/// Quote-level amounts. This is also the shape persisted next to a quote and
/// later checked with [`reconcile`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub shipping_amount: Decimal,
    pub total: Decimal,
}

impl QuoteTotals {
    pub fn is_reconciled(&self) -> bool {
        self.subtotal - self.discount_amount + self.tax_amount + self.shipping_amount == self.total
    }
}

/// A quote whose derived fields were computed from its current inputs.
///
/// Only the calculator constructs this type. Anything that needs trustworthy
/// numbers (document composition, persistence) takes a `PricedQuote` rather
/// than a raw [`Quote`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PricedQuote {
    quote: Quote,
    lines: Vec<PricedLineItem>,
    totals: QuoteTotals,
    trace: PricingTrace,
}

impl PricedQuote {
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn lines(&self) -> &[PricedLineItem] {
        &self.lines
    }

    pub fn totals(&self) -> &QuoteTotals {
        &self.totals
    }

    pub fn trace(&self) -> &PricingTrace {
        &self.trace
    }

    pub fn currency(&self) -> &str {
        &self.quote.currency
    }

    pub fn into_quote(self) -> Quote {
        self.quote
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The calculator produced numbers that do not add up. This is a defect,
    /// never a user error.
    #[error("pricing invariant violated at {scope}: {detail}")]
    InvariantViolation { scope: String, detail: String },
    #[error("stored {field} {stored} differs from recomputed {computed}")]
    Drift { field: &'static str, stored: Decimal, computed: Decimal },
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, quote: &Quote) -> Result<PricedQuote, PricingError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, quote: &Quote) -> Result<PricedQuote, PricingError> {
        price_quote(quote)
    }
}

/// Recomputes every line and the quote totals from scratch.
///
/// Lines are priced first (each rounded to cents), then the quote aggregates
/// the rounded line values. Any invalid input aborts before totals exist.
pub fn price_quote(quote: &Quote) -> Result<PricedQuote, PricingError> {
    let lines = quote
        .lines
        .iter()
        .enumerate()
        .map(|(index, input)| price_line_item(index, input))
        .collect::<Result<Vec<_>, _>>()?;
    check_adjustments(&quote.adjustments)?;

    let totals = aggregate(&lines, &quote.adjustments)?;
    verify(quote, &lines, &totals)?;

    debug!(
        event_name = "pricing.quote.priced",
        quote_id = %quote.id.0,
        line_count = lines.len(),
        total = %totals.total,
        "quote priced"
    );

    let trace = build_trace(quote, &lines, &totals);
    Ok(PricedQuote { quote: quote.clone(), lines, totals, trace })
}

/// Re-prices `quote` and compares the result with totals persisted earlier.
/// Returns the fresh pricing when nothing drifted.
pub fn reconcile(quote: &Quote, stored: &QuoteTotals) -> Result<PricedQuote, PricingError> {
    let priced = price_quote(quote)?;
    let computed = priced.totals();

    let pairs = [
        ("subtotal", stored.subtotal, computed.subtotal),
        ("discount_amount", stored.discount_amount, computed.discount_amount),
        ("tax_amount", stored.tax_amount, computed.tax_amount),
        ("shipping_amount", stored.shipping_amount, computed.shipping_amount),
        ("total", stored.total, computed.total),
    ];

    if let Some((field, stored, computed)) =
        pairs.into_iter().find(|(_, stored, computed)| stored != computed)
    {
        warn!(
            event_name = "pricing.quote.drift",
            quote_id = %quote.id.0,
            field,
            stored = %stored,
            computed = %computed,
            "persisted totals differ from recomputed totals"
        );
        return Err(PricingError::Drift { field, stored, computed });
    }

    Ok(priced)
}

fn aggregate(
    lines: &[PricedLineItem],
    adjustments: &QuoteAdjustments,
) -> Result<QuoteTotals, PricingError> {
    let discount_percent = clamp_percent(adjustments.discount_percent);
    let too_large = |field: PricingField, value: Decimal| {
        PricingError::from(ValidationError::quote(field, ViolationKind::OutOfRange, value))
    };

    let subtotal = checked_sum(lines, PricingField::LineTotal, PricedLineItem::line_total)?;
    let discount_amount = percent_of(subtotal, discount_percent)
        .map(round_currency)
        .ok_or_else(|| too_large(PricingField::Subtotal, subtotal))?;
    let tax_amount =
        checked_sum(lines, PricingField::LineTaxAmount, PricedLineItem::line_tax_amount)?;
    let shipping_amount = round_currency(adjustments.shipping_amount);

    let taxed = (subtotal - discount_amount)
        .checked_add(tax_amount)
        .ok_or_else(|| too_large(PricingField::Total, subtotal - discount_amount))?;
    let total = taxed
        .checked_add(shipping_amount)
        .ok_or_else(|| too_large(PricingField::ShippingAmount, shipping_amount))?;

    Ok(QuoteTotals {
        subtotal,
        discount_percent,
        discount_amount,
        tax_amount,
        shipping_amount,
        total,
    })
}

/// Sums one derived amount across lines. An overflow names the line whose
/// amount no longer fits.
fn checked_sum(
    lines: &[PricedLineItem],
    field: PricingField,
    amount: impl Fn(&PricedLineItem) -> Decimal,
) -> Result<Decimal, ValidationError> {
    lines.iter().try_fold(round_currency(Decimal::ZERO), |sum, line| {
        sum.checked_add(amount(line)).ok_or_else(|| {
            ValidationError::line(line.index(), field, ViolationKind::OutOfRange, amount(line))
        })
    })
}

fn verify(
    quote: &Quote,
    lines: &[PricedLineItem],
    totals: &QuoteTotals,
) -> Result<(), PricingError> {
    if let Some(line) = lines.iter().find(|line| !line.is_reconciled()) {
        return Err(invariant_violation(
            quote,
            format!("line {}", line.index()),
            format!(
                "line_total {} + line_tax_amount {} != line_total_with_tax {}",
                line.line_total(),
                line.line_tax_amount(),
                line.line_total_with_tax()
            ),
        ));
    }

    if !totals.is_reconciled() {
        return Err(invariant_violation(
            quote,
            "quote".to_string(),
            format!(
                "subtotal {} - discount {} + tax {} + shipping {} != total {}",
                totals.subtotal,
                totals.discount_amount,
                totals.tax_amount,
                totals.shipping_amount,
                totals.total
            ),
        ));
    }

    Ok(())
}

fn invariant_violation(quote: &Quote, scope: String, detail: String) -> PricingError {
    error!(
        event_name = "pricing.invariant_violation",
        quote_id = %quote.id.0,
        scope = %scope,
        detail = %detail,
        "pricing invariant violated"
    );
    PricingError::InvariantViolation { scope, detail }
}

fn build_trace(quote: &Quote, lines: &[PricedLineItem], totals: &QuoteTotals) -> PricingTrace {
    let step = |stage: &str, detail: String, amount: Decimal| PricingTraceStep {
        stage: stage.to_string(),
        detail,
        amount,
    };

    let mut steps = lines
        .iter()
        .map(|line| {
            step(
                "line_total",
                format!(
                    "line {}: {} x {} less {}%",
                    line.index(),
                    line.input().quantity,
                    line.input().unit_price,
                    line.input().discount_percent
                ),
                line.line_total(),
            )
        })
        .collect::<Vec<_>>();

    steps.push(step("subtotal", "sum(line_total)".to_string(), totals.subtotal));
    steps.push(step(
        "quote_discount",
        format!("{}% of subtotal", totals.discount_percent),
        totals.discount_amount,
    ));
    steps.push(step("tax", "sum(line_tax_amount)".to_string(), totals.tax_amount));
    steps.push(step("shipping", "flat".to_string(), totals.shipping_amount));
    steps.push(step(
        "total",
        "subtotal - quote_discount + tax + shipping".to_string(),
        totals.total,
    ));

    PricingTrace { quote_id: quote.id.clone(), currency: quote.currency.clone(), steps }
}

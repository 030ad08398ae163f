use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::product::ProductId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
    Revised,
    Cancelled,
}

/// Raw, user-editable inputs of one quote row.
///
/// Derived amounts are never stored here; they live on
/// [`crate::pricing::PricedLineItem`] and are recomputed from these inputs.
/// Discounts are percentages only. A fixed-amount line discount is a
/// separate concept that this model does not carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub is_taxable: bool,
    #[serde(default)]
    pub tax_rate: Decimal,
}

impl LineItemInput {
    /// A new empty row: one unit at zero price, untaxed, undiscounted.
    pub fn blank() -> Self {
        Self {
            product_id: None,
            name: String::new(),
            sku: None,
            description: None,
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            is_taxable: false,
            tax_rate: Decimal::ZERO,
        }
    }
}

/// Quote-level inputs applied after line pricing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteAdjustments {
    /// Applied to the pre-tax sum of line totals, never to individual lines.
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub shipping_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    #[serde(default)]
    pub quote_number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineItemInput>,
    #[serde(default)]
    pub adjustments: QuoteAdjustments,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Quote {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: QuoteId(id.into()),
            quote_number: None,
            title: None,
            status: QuoteStatus::Draft,
            currency: default_currency(),
            issued_on: None,
            valid_until: None,
            customer: None,
            notes: None,
            lines: Vec::new(),
            adjustments: QuoteAdjustments::default(),
        }
    }

    /// Financial fields may only change while the quote is a draft.
    pub fn is_editable(&self) -> bool {
        self.status == QuoteStatus::Draft
    }

    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (self.status, next),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Sent, QuoteStatus::Accepted)
                | (QuoteStatus::Sent, QuoteStatus::Declined)
                | (QuoteStatus::Sent, QuoteStatus::Expired)
                | (QuoteStatus::Sent, QuoteStatus::Revised)
                | (QuoteStatus::Declined, QuoteStatus::Revised)
                | (QuoteStatus::Expired, QuoteStatus::Revised)
                | (QuoteStatus::Revised, QuoteStatus::Draft)
                | (QuoteStatus::Draft, QuoteStatus::Cancelled)
                | (QuoteStatus::Sent, QuoteStatus::Cancelled)
                | (QuoteStatus::Revised, QuoteStatus::Cancelled)
        )
    }

    pub fn transition_to(&mut self, next: QuoteStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidQuoteTransition { from: self.status, to: next })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{LineItemInput, Quote, QuoteStatus};

    fn quote(status: QuoteStatus) -> Quote {
        let mut quote = Quote::new("Q-1");
        quote.status = status;
        quote.lines.push(LineItemInput {
            name: "Onboarding".to_string(),
            unit_price: Decimal::new(1000, 2),
            ..LineItemInput::blank()
        });
        quote
    }

    #[test]
    fn allows_valid_lifecycle_transition() {
        let mut quote = quote(QuoteStatus::Draft);
        quote.transition_to(QuoteStatus::Sent).expect("draft->sent");
        assert_eq!(quote.status, QuoteStatus::Sent);
        assert!(!quote.is_editable());
    }

    #[test]
    fn blocks_invalid_lifecycle_transition() {
        let mut quote = quote(QuoteStatus::Draft);
        let error =
            quote.transition_to(QuoteStatus::Accepted).expect_err("draft->accepted should fail");
        assert!(matches!(error, crate::errors::DomainError::InvalidQuoteTransition { .. }));
    }

    #[test]
    fn declined_quotes_reopen_as_drafts_through_revision() {
        let mut quote = quote(QuoteStatus::Declined);
        quote.transition_to(QuoteStatus::Revised).expect("declined -> revised");
        quote.transition_to(QuoteStatus::Draft).expect("revised -> draft");

        assert!(quote.is_editable());
    }

    #[test]
    fn accepted_quotes_are_terminal() {
        let quote = quote(QuoteStatus::Accepted);
        assert!(!quote.can_transition_to(QuoteStatus::Cancelled));
        assert!(!quote.can_transition_to(QuoteStatus::Revised));
    }

    #[test]
    fn minimal_record_deserializes_with_defaults() {
        let quote: Quote = serde_json::from_str(
            r#"{"id":"Q-9","lines":[{"quantity":"2","unit_price":"9.99"}]}"#,
        )
        .expect("minimal quote record");

        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.lines[0].discount_percent, Decimal::ZERO);
        assert!(!quote.lines[0].is_taxable);
        assert_eq!(quote.adjustments.shipping_amount, Decimal::ZERO);
    }
}

use serde::Serialize;
use tracing::info;

use crate::document::{Document, DocumentComposer, StandardDocumentComposer};
use crate::domain::quote::Quote;
use crate::domain::template::Template;
use crate::pricing::{DeterministicPricingEngine, PricedQuote, PricingEngine, PricingError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuoteEvaluation {
    pub priced: PricedQuote,
    pub document: Document,
}

/// Prices a quote and lays it out in one step.
pub trait QuoteRuntime: Send + Sync {
    fn evaluate_quote(
        &self,
        quote: &Quote,
        template: Option<&Template>,
    ) -> Result<QuoteEvaluation, PricingError>;
}

pub struct DeterministicQuoteRuntime<P, C> {
    pricing_engine: P,
    composer: C,
}

impl<P, C> DeterministicQuoteRuntime<P, C> {
    pub fn new(pricing_engine: P, composer: C) -> Self {
        Self { pricing_engine, composer }
    }
}

impl Default for DeterministicQuoteRuntime<DeterministicPricingEngine, StandardDocumentComposer> {
    fn default() -> Self {
        Self::new(DeterministicPricingEngine, StandardDocumentComposer)
    }
}

impl<P, C> QuoteRuntime for DeterministicQuoteRuntime<P, C>
where
    P: PricingEngine,
    C: DocumentComposer,
{
    fn evaluate_quote(
        &self,
        quote: &Quote,
        template: Option<&Template>,
    ) -> Result<QuoteEvaluation, PricingError> {
        let priced = self.pricing_engine.price(quote)?;
        let document = self.composer.compose(&priced, template);

        info!(
            event_name = "quote.evaluated",
            quote_id = %quote.id.0,
            line_count = priced.lines().len(),
            total = %priced.totals().total,
            "quote evaluated"
        );

        Ok(QuoteEvaluation { priced, document })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{DeterministicQuoteRuntime, QuoteRuntime};
    use crate::document::{Document, DocumentComposer, StandardDocumentComposer};
    use crate::domain::quote::{LineItemInput, Quote};
    use crate::domain::template::Template;
    use crate::pricing::{DeterministicPricingEngine, PricedQuote, PricingError};

    fn quote() -> Quote {
        let mut quote = Quote::new("Q-runtime");
        quote.lines.push(LineItemInput {
            name: "Onboarding".to_string(),
            quantity: Decimal::from(3),
            unit_price: Decimal::new(4_999, 2),
            ..LineItemInput::blank()
        });
        quote
    }

    #[test]
    fn default_runtime_returns_priced_quote_and_document() {
        let runtime = DeterministicQuoteRuntime::default();
        let evaluation = runtime.evaluate_quote(&quote(), None).expect("valid quote");

        assert_eq!(evaluation.priced.totals().total, Decimal::new(14_997, 2));
        assert_eq!(evaluation.document.quote_id, evaluation.priced.quote().id);
        let total_row = evaluation
            .document
            .totals()
            .and_then(|totals| totals.rows.last())
            .expect("total row");
        assert_eq!(total_row.amount, evaluation.priced.totals().total);
    }

    #[test]
    fn validation_failure_stops_before_composition() {
        let mut quote = quote();
        quote.lines[0].quantity = Decimal::ZERO;

        let error = DeterministicQuoteRuntime::default()
            .evaluate_quote(&quote, None)
            .expect_err("zero quantity");
        assert!(matches!(error, PricingError::Validation(_)));
    }

    #[test]
    fn runtime_supports_explicit_engine_interfaces() {
        struct NoSectionsComposer;

        impl DocumentComposer for NoSectionsComposer {
            fn compose(&self, quote: &PricedQuote, _template: Option<&Template>) -> Document {
                Document {
                    quote_id: quote.quote().id.clone(),
                    currency: quote.currency().to_string(),
                    sections: Vec::new(),
                }
            }
        }

        let runtime =
            DeterministicQuoteRuntime::new(DeterministicPricingEngine, NoSectionsComposer);
        let evaluation = runtime.evaluate_quote(&quote(), None).expect("valid quote");
        assert!(evaluation.document.sections.is_empty());

        let standard = DeterministicQuoteRuntime::new(
            DeterministicPricingEngine,
            StandardDocumentComposer,
        )
        .evaluate_quote(&quote(), None)
        .expect("valid quote");
        assert_eq!(standard.document.sections.len(), 5);
        assert_eq!(standard.priced, evaluation.priced);
    }
}

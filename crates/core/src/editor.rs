use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{apply_product, line_from_product, CatalogError};
use crate::domain::product::Product;
use crate::domain::quote::{LineItemInput, Quote, QuoteStatus};
use crate::errors::DomainError;
use crate::pricing::{price_quote, PricedQuote, PricingError};

/// A single-field change to one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineEdit {
    Quantity(Decimal),
    UnitPrice(Decimal),
    DiscountPercent(Decimal),
    Taxable(bool),
    TaxRate(Decimal),
    Name(String),
    Sku(Option<String>),
    Description(Option<String>),
}

impl LineEdit {
    fn apply(self, line: &mut LineItemInput) {
        match self {
            Self::Quantity(quantity) => line.quantity = quantity,
            Self::UnitPrice(unit_price) => line.unit_price = unit_price,
            Self::DiscountPercent(percent) => line.discount_percent = percent,
            Self::Taxable(is_taxable) => line.is_taxable = is_taxable,
            Self::TaxRate(rate) => line.tax_rate = rate,
            Self::Name(name) => line.name = name,
            Self::Sku(sku) => line.sku = sku,
            Self::Description(description) => line.description = description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("quote is {0:?} and can no longer be edited")]
    Locked(QuoteStatus),
    #[error("line {index} does not exist (quote has {len} lines)")]
    LineNotFound { index: usize, len: usize },
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Holds a quote in its always-priced form while a user edits it.
///
/// Every mutation re-prices the whole quote. A mutation that cannot be
/// priced is discarded and the previous state is kept.
#[derive(Clone, Debug)]
pub struct QuoteEditor {
    priced: PricedQuote,
}

impl QuoteEditor {
    pub fn open(quote: Quote) -> Result<Self, EditorError> {
        Ok(Self { priced: price_quote(&quote)? })
    }

    pub fn priced(&self) -> &PricedQuote {
        &self.priced
    }

    pub fn into_priced(self) -> PricedQuote {
        self.priced
    }

    /// Appends an empty row and returns its index.
    pub fn add_blank_line(&mut self) -> Result<usize, EditorError> {
        self.add_line(LineItemInput::blank())
    }

    /// Appends a row seeded from a catalog product and returns its index.
    pub fn add_catalog_line(&mut self, product: &Product) -> Result<usize, EditorError> {
        self.add_line(line_from_product(product)?)
    }

    pub fn add_line(&mut self, line: LineItemInput) -> Result<usize, EditorError> {
        let mut index = 0;
        self.edit(|quote| {
            index = quote.lines.len();
            quote.lines.push(line);
            Ok(())
        })?;
        Ok(index)
    }

    pub fn select_product(
        &mut self,
        index: usize,
        product: &Product,
    ) -> Result<&PricedQuote, EditorError> {
        self.edit(|quote| {
            let line = line_mut(quote, index)?;
            apply_product(line, product)?;
            Ok(())
        })
    }

    pub fn apply(&mut self, index: usize, edit: LineEdit) -> Result<&PricedQuote, EditorError> {
        self.edit(|quote| {
            edit.apply(line_mut(quote, index)?);
            Ok(())
        })
    }

    pub fn remove_line(&mut self, index: usize) -> Result<LineItemInput, EditorError> {
        let mut removed = None;
        self.edit(|quote| {
            let len = quote.lines.len();
            if index >= len {
                return Err(EditorError::LineNotFound { index, len });
            }
            removed = Some(quote.lines.remove(index));
            Ok(())
        })?;
        removed.ok_or(EditorError::LineNotFound { index, len: self.priced.lines().len() })
    }

    pub fn set_discount_percent(&mut self, percent: Decimal) -> Result<&PricedQuote, EditorError> {
        self.edit(|quote| {
            quote.adjustments.discount_percent = percent;
            Ok(())
        })
    }

    pub fn set_shipping_amount(&mut self, amount: Decimal) -> Result<&PricedQuote, EditorError> {
        self.edit(|quote| {
            quote.adjustments.shipping_amount = amount;
            Ok(())
        })
    }

    /// Moves the quote through its lifecycle. Not a financial edit, so it is
    /// allowed on locked quotes.
    pub fn transition_to(&mut self, next: QuoteStatus) -> Result<&PricedQuote, EditorError> {
        let mut quote = self.priced.quote().clone();
        quote.transition_to(next)?;
        self.commit(quote)
    }

    fn edit(
        &mut self,
        change: impl FnOnce(&mut Quote) -> Result<(), EditorError>,
    ) -> Result<&PricedQuote, EditorError> {
        let current = self.priced.quote();
        if !current.is_editable() {
            return Err(EditorError::Locked(current.status));
        }

        let mut draft = current.clone();
        change(&mut draft)?;
        self.commit(draft)
    }

    fn commit(&mut self, quote: Quote) -> Result<&PricedQuote, EditorError> {
        self.priced = price_quote(&quote)?;
        Ok(&self.priced)
    }
}

fn line_mut(quote: &mut Quote, index: usize) -> Result<&mut LineItemInput, EditorError> {
    let len = quote.lines.len();
    quote.lines.get_mut(index).ok_or(EditorError::LineNotFound { index, len })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{EditorError, LineEdit, QuoteEditor};
    use crate::catalog::line_from_product;
    use crate::domain::product::{Product, ProductId};
    use crate::domain::quote::{Quote, QuoteStatus};
    use crate::pricing::{price_quote, PricingError};

    fn product() -> Product {
        Product {
            id: ProductId("seat".to_string()),
            sku: "SEAT-01".to_string(),
            name: "Seat license".to_string(),
            description: None,
            unit_price: Decimal::from(100),
            is_taxable: true,
            tax_rate: Decimal::from(8),
            active: true,
        }
    }

    fn editor() -> QuoteEditor {
        QuoteEditor::open(Quote::new("Q-edit")).expect("empty quote opens")
    }

    #[test]
    fn tax_rate_edit_recomputes_every_dependent_field() {
        let mut editor = editor();
        let index = editor.add_catalog_line(&product()).expect("catalog line");
        editor.apply(index, LineEdit::Quantity(Decimal::from(2))).expect("quantity edit");

        let priced = editor.apply(index, LineEdit::TaxRate(Decimal::from(10))).expect("tax edit");
        let line = &priced.lines()[index];
        assert_eq!(line.line_tax_amount(), Decimal::new(2_000, 2));
        assert_eq!(line.line_total_with_tax(), Decimal::new(22_000, 2));
        assert_eq!(priced.totals().tax_amount, Decimal::new(2_000, 2));
        assert_eq!(priced.totals().total, Decimal::new(22_000, 2));
    }

    #[test]
    fn catalog_selection_and_manual_entry_price_identically() {
        let mut selected = editor();
        let index = selected.add_blank_line().expect("blank line");
        selected.select_product(index, &product()).expect("select product");

        let mut typed = editor();
        let index = typed.add_blank_line().expect("blank line");
        for edit in [
            LineEdit::Name("Seat license".to_string()),
            LineEdit::Sku(Some("SEAT-01".to_string())),
            LineEdit::UnitPrice(Decimal::from(100)),
            LineEdit::Taxable(true),
            LineEdit::TaxRate(Decimal::from(8)),
        ] {
            typed.apply(index, edit).expect("manual edit");
        }

        let from_catalog = selected.priced();
        let by_hand = typed.priced();
        assert_eq!(from_catalog.totals(), by_hand.totals());
        assert_eq!(
            from_catalog.lines()[0].line_total_with_tax(),
            by_hand.lines()[0].line_total_with_tax()
        );
    }

    #[test]
    fn rejected_edit_keeps_previous_priced_state() {
        let mut editor = editor();
        let index = editor.add_catalog_line(&product()).expect("catalog line");
        let before = editor.priced().clone();

        let error =
            editor.apply(index, LineEdit::Quantity(Decimal::ZERO)).expect_err("zero quantity");
        assert!(matches!(error, EditorError::Pricing(PricingError::Validation(_))));
        assert_eq!(editor.priced(), &before);
    }

    #[test]
    fn removing_a_line_reprices_and_returns_it() {
        let mut editor = editor();
        editor.add_catalog_line(&product()).expect("first line");
        editor.add_blank_line().expect("second line");

        let removed = editor.remove_line(0).expect("remove first");
        assert_eq!(removed.name, "Seat license");
        assert_eq!(editor.priced().lines().len(), 1);
        assert_eq!(editor.priced().totals().total, Decimal::ZERO);

        let error = editor.remove_line(5).expect_err("missing line");
        assert_eq!(error, EditorError::LineNotFound { index: 5, len: 1 });
    }

    #[test]
    fn editor_state_matches_fresh_pricing_after_every_edit() {
        let mut editor = editor();
        let index = editor.add_catalog_line(&product()).expect("catalog line");
        editor.apply(index, LineEdit::DiscountPercent(Decimal::new(125, 1))).expect("discount");
        editor.set_discount_percent(Decimal::from(3)).expect("quote discount");
        editor.set_shipping_amount(Decimal::new(1_250, 2)).expect("shipping");

        let fresh = price_quote(editor.priced().quote()).expect("fresh pricing");
        assert_eq!(editor.priced(), &fresh);
    }

    #[test]
    fn sent_quotes_refuse_financial_edits() {
        let mut quote = Quote::new("Q-sent");
        quote.lines.push(line_from_product(&product()).expect("line"));
        let mut editor = QuoteEditor::open(quote).expect("quote opens");
        editor.transition_to(QuoteStatus::Sent).expect("draft -> sent");

        let error = editor.set_shipping_amount(Decimal::from(5)).expect_err("locked");
        assert_eq!(error, EditorError::Locked(QuoteStatus::Sent));

        editor.transition_to(QuoteStatus::Revised).expect("sent -> revised");
        editor.transition_to(QuoteStatus::Draft).expect("revised -> draft");
        assert!(editor.set_shipping_amount(Decimal::from(5)).is_ok());
    }
}

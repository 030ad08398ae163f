pub mod catalog;
pub mod config;
pub mod document;
pub mod domain;
pub mod editor;
pub mod errors;
pub mod pricing;
pub mod runtime;

pub use catalog::{Catalog, CatalogError};
pub use document::{compose_document, Document, DocumentComposer, StandardDocumentComposer};
pub use domain::customer::Customer;
pub use domain::product::{Product, ProductId};
pub use domain::quote::{LineItemInput, Quote, QuoteAdjustments, QuoteId, QuoteStatus};
pub use domain::template::{BrandingOverrides, ColumnToggles, Template, TemplateId};
pub use editor::{EditorError, LineEdit, QuoteEditor};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::{
    price_line_item, price_quote, reconcile, validate_quote, DeterministicPricingEngine,
    PricedLineItem, PricedQuote, PricingEngine, PricingError, QuoteTotals, ValidationError,
};
pub use runtime::{DeterministicQuoteRuntime, QuoteEvaluation, QuoteRuntime};

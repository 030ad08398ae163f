use thiserror::Error;

use crate::catalog::CatalogError;
use crate::domain::quote::QuoteStatus;
use crate::editor::EditorError;
use crate::pricing::{PricingError, ValidationError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid quote transition from {from:?} to {to:?}")]
    InvalidQuoteTransition { from: QuoteStatus, to: QuoteStatus },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("quote is {0:?} and its financial fields are locked")]
    QuoteLocked(QuoteStatus),
    #[error("stored totals are out of date: {0}")]
    StaleTotals(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<PricingError> for DomainError {
    fn from(value: PricingError) -> Self {
        match value {
            PricingError::Validation(violation) => Self::Validation(violation),
            error @ PricingError::InvariantViolation { .. } => {
                Self::InvariantViolation(error.to_string())
            }
            error @ PricingError::Drift { .. } => Self::StaleTotals(error.to_string()),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("could not read input: {0}")]
    Input(String),
    #[error("rendering failure: {0}")]
    Render(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<PricingError> for ApplicationError {
    fn from(value: PricingError) -> Self {
        Self::Domain(value.into())
    }
}

impl From<EditorError> for ApplicationError {
    fn from(value: EditorError) -> Self {
        match value {
            EditorError::Pricing(error) => error.into(),
            EditorError::Catalog(error) => Self::Domain(error.into()),
            EditorError::Domain(error) => Self::Domain(error),
            EditorError::Locked(status) => Self::Domain(DomainError::QuoteLocked(status)),
            error @ EditorError::LineNotFound { .. } => Self::Input(error.to_string()),
        }
    }
}

impl ApplicationError {
    /// Stable machine-readable class used in structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Validation(_)) => "validation",
            Self::Domain(DomainError::InvalidQuoteTransition { .. }) => "invalid_transition",
            Self::Domain(DomainError::Catalog(_)) => "catalog",
            Self::Domain(DomainError::QuoteLocked(_)) => "quote_locked",
            Self::Domain(DomainError::StaleTotals(_)) => "stale_totals",
            Self::Domain(DomainError::InvariantViolation(_)) => "invariant_violation",
            Self::Input(_) => "input",
            Self::Render(_) => "render",
            Self::Configuration(_) => "configuration",
        }
    }

    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The quote could not be priced. Check the highlighted values and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            // Calculator defects reach operators, never the customer-facing message.
            ApplicationError::Domain(error @ DomainError::InvariantViolation(_)) => {
                Self::Internal { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Input(message) => {
                Self::BadRequest { message, correlation_id: unassigned() }
            }
            ApplicationError::Render(message) | ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: unassigned() }
            }
        }
    }
}

use std::path::Path;

use quoteforge_core::pricing::{reconcile, DeterministicPricingEngine, PricingEngine};
use quoteforge_core::ApplicationError;
use tracing::info;

use super::input::{load_quote, load_totals};
use super::CommandResult;

const COMMAND: &str = "price";

/// Prices the quote in `input`. With `stored_totals`, the fresh totals are
/// also checked against a previously persisted copy.
pub fn run(input: &Path, stored_totals: Option<&Path>) -> CommandResult {
    let quote = match load_quote(input) {
        Ok(quote) => quote,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };
    if let Some(invalid) = CommandResult::invalid_quote(COMMAND, &quote) {
        return invalid;
    }

    let priced = match stored_totals {
        Some(path) => load_totals(path).and_then(|stored| {
            reconcile(&quote, &stored).map_err(ApplicationError::from)
        }),
        None => DeterministicPricingEngine.price(&quote).map_err(ApplicationError::from),
    };

    match priced {
        Ok(priced) => {
            info!(
                event_name = "cli.price.completed",
                quote_id = %quote.id.0,
                total = %priced.totals().total,
                "quote priced"
            );
            let message = format!("priced quote {} at {}", quote.id.0, priced.totals().total);
            CommandResult::success_with_data(COMMAND, message, &priced)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

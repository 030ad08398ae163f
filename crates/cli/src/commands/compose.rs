use std::path::Path;

use quoteforge_core::config::AppConfig;
use quoteforge_core::{ApplicationError, DeterministicQuoteRuntime, QuoteEvaluation, QuoteRuntime};

use super::input::{load_quote, load_template};
use super::CommandResult;

const COMMAND: &str = "compose";

pub fn run(config: &AppConfig, input: &Path, template: Option<&str>) -> CommandResult {
    match evaluate(COMMAND, config, input, template) {
        Ok(evaluation) => {
            let message = format!(
                "composed quote {} with {} table row(s)",
                evaluation.priced.quote().id.0,
                evaluation.priced.lines().len()
            );
            CommandResult::success_with_data(COMMAND, message, &evaluation.document)
        }
        Err(failure) => failure,
    }
}

/// Loads, validates, prices and composes a quote. Shared with `render`.
pub(crate) fn evaluate(
    command: &str,
    config: &AppConfig,
    input: &Path,
    template: Option<&str>,
) -> Result<QuoteEvaluation, CommandResult> {
    let quote = load_quote(input).map_err(|error| CommandResult::from_error(command, &error))?;
    if let Some(invalid) = CommandResult::invalid_quote(command, &quote) {
        return Err(invalid);
    }
    let template = load_template(config, template)
        .map_err(|error| CommandResult::from_error(command, &error))?;

    DeterministicQuoteRuntime::default()
        .evaluate_quote(&quote, template.as_ref())
        .map_err(|error| CommandResult::from_error(command, &ApplicationError::from(error)))
}

use std::fs;
use std::path::Path;

use quoteforge_core::config::AppConfig;
use quoteforge_core::ApplicationError;
use quoteforge_render::HtmlRenderer;
use tracing::info;

use super::compose::evaluate;
use super::CommandResult;

const COMMAND: &str = "render";

/// Renders the quote to HTML. The page goes to `output` when given,
/// otherwise it becomes the command output.
pub fn run(
    config: &AppConfig,
    input: &Path,
    template: Option<&str>,
    output: Option<&Path>,
) -> CommandResult {
    let evaluation = match evaluate(COMMAND, config, input, template) {
        Ok(evaluation) => evaluation,
        Err(failure) => return failure,
    };

    let renderer = match config.render.template_dir.as_deref() {
        Some(dir) => HtmlRenderer::from_dir(dir),
        None => HtmlRenderer::embedded(),
    };
    let html = match renderer.and_then(|renderer| renderer.render(&evaluation.document)) {
        Ok(html) => html,
        Err(error) => {
            return CommandResult::from_error(COMMAND, &ApplicationError::Render(error.to_string()))
        }
    };

    let Some(output) = output else {
        return CommandResult { exit_code: 0, output: html };
    };

    if let Err(error) = fs::write(output, &html) {
        let error = ApplicationError::Input(format!("writing `{}`: {error}", output.display()));
        return CommandResult::from_error(COMMAND, &error);
    }

    info!(
        event_name = "cli.render.written",
        quote_id = %evaluation.document.quote_id.0,
        path = %output.display(),
        bytes = html.len(),
        "rendered quote written"
    );
    CommandResult::success(
        COMMAND,
        format!("wrote {} bytes to {}", html.len(), output.display()),
    )
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quoteforge_core::config::AppConfig;
use quoteforge_core::pricing::QuoteTotals;
use quoteforge_core::{ApplicationError, Quote, Template};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Reads a quote record. `.toml` files are parsed as TOML, anything else as
/// JSON.
pub fn load_quote(path: &Path) -> Result<Quote, ApplicationError> {
    read_record(path).map_err(into_input_error)
}

/// Reads totals persisted next to a quote by an earlier pricing run.
pub fn load_totals(path: &Path) -> Result<QuoteTotals, ApplicationError> {
    read_record(path).map_err(into_input_error)
}

/// Resolves `--template`: an existing file path is read directly, otherwise
/// the value is a template id looked up in the configured directory. Without
/// a selector the configured default template applies, if any.
pub fn load_template(
    config: &AppConfig,
    selector: Option<&str>,
) -> Result<Option<Template>, ApplicationError> {
    let Some(selector) = selector.or(config.templates.default_template.as_deref()) else {
        return Ok(None);
    };

    let path = template_location(config, selector);
    if !path.exists() {
        return Err(ApplicationError::Input(format!(
            "template `{selector}` was not found (looked for `{}`)",
            path.display()
        )));
    }

    let template: Template = read_record(&path).map_err(into_input_error)?;
    debug!(
        event_name = "cli.template.loaded",
        template_id = %template.id.0,
        path = %path.display(),
        "template loaded"
    );
    Ok(Some(template))
}

fn template_location(config: &AppConfig, selector: &str) -> PathBuf {
    let direct = PathBuf::from(selector);
    if direct.is_file() {
        direct
    } else {
        config.template_path(selector)
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading `{}`", path.display()))?;

    let is_toml = path.extension().is_some_and(|extension| extension == "toml");
    if is_toml {
        toml::from_str(&raw).with_context(|| format!("parsing TOML in `{}`", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("parsing JSON in `{}`", path.display()))
    }
}

fn into_input_error(error: anyhow::Error) -> ApplicationError {
    ApplicationError::Input(format!("{error:#}"))
}

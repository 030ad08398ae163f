use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quoteforge_core::config::{resolve_config_path, AppConfig, ConfigOverrides, LoadOptions};
use toml::Value;

use super::CommandResult;

const COMMAND: &str = "config";

struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
    overridden: bool,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "configuration",
                format!("config validation failed: {error}"),
                super::EXIT_IO,
            )
        }
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec![
        "effective config (source precedence: override > env > file > default):".to_string(),
    ];
    for field in fields(&config, &options.overrides) {
        let source = if field.overridden {
            "override (command line)".to_string()
        } else {
            field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            )
        };
        lines.push(render_line(field.key_path, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig, overrides: &ConfigOverrides) -> Vec<Field> {
    let path_or_unset = |path: Option<&PathBuf>| {
        path.map(|path| path.display().to_string()).unwrap_or_else(|| "<unset>".to_string())
    };

    vec![
        Field {
            key_path: "templates.directory",
            env_keys: &["QUOTEFORGE_TEMPLATES_DIRECTORY"],
            value: config.templates.directory.display().to_string(),
            overridden: overrides.template_directory.is_some(),
        },
        Field {
            key_path: "templates.default",
            env_keys: &["QUOTEFORGE_TEMPLATES_DEFAULT"],
            value: config.templates.default_template.clone().unwrap_or_else(|| "<unset>".into()),
            overridden: overrides.default_template.is_some(),
        },
        Field {
            key_path: "render.template_dir",
            env_keys: &["QUOTEFORGE_RENDER_TEMPLATE_DIR"],
            value: path_or_unset(config.render.template_dir.as_ref()),
            overridden: overrides.render_template_dir.is_some(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["QUOTEFORGE_LOGGING_LEVEL", "QUOTEFORGE_LOG_LEVEL"],
            value: config.logging.level.clone(),
            overridden: overrides.log_level.is_some(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["QUOTEFORGE_LOGGING_FORMAT", "QUOTEFORGE_LOG_FORMAT"],
            value: config.logging.format.as_str().to_string(),
            overridden: overrides.log_format.is_some(),
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()))
    {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

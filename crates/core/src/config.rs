use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["quoteforge.toml", "config/quoteforge.toml"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub templates: TemplateConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Where quote templates (`<id>.toml` or `<id>.json`) are looked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateConfig {
    pub directory: PathBuf,
    pub default_template: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Directory of Tera templates replacing the embedded HTML layout.
    pub template_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub template_directory: Option<PathBuf>,
    pub default_template: Option<String>,
    pub render_template_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            templates: TemplateConfig {
                directory: PathBuf::from("templates"),
                default_template: None,
            },
            render: RenderConfig { template_dir: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then `QUOTEFORGE_*` variables, then
    /// explicit overrides. The merged result is validated once at the end.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            config.apply_patch(read_patch(&path)?);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Path of the template record with the given id, preferring TOML.
    pub fn template_path(&self, template_id: &str) -> PathBuf {
        let toml = self.templates.directory.join(format!("{template_id}.toml"));
        if toml.exists() {
            return toml;
        }
        let json = self.templates.directory.join(format!("{template_id}.json"));
        if json.exists() {
            json
        } else {
            toml
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(templates) = patch.templates {
            if let Some(directory) = templates.directory {
                self.templates.directory = directory;
            }
            if let Some(default_template) = templates.default {
                self.templates.default_template = Some(default_template);
            }
        }

        if let Some(render) = patch.render {
            if let Some(template_dir) = render.template_dir {
                self.render.template_dir = Some(template_dir);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("QUOTEFORGE_TEMPLATES_DIRECTORY") {
            self.templates.directory = PathBuf::from(value);
        }
        if let Some(value) = read_env("QUOTEFORGE_TEMPLATES_DEFAULT") {
            self.templates.default_template = Some(value);
        }
        if let Some(value) = read_env("QUOTEFORGE_RENDER_TEMPLATE_DIR") {
            self.render.template_dir = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("QUOTEFORGE_LOGGING_LEVEL").or_else(|| read_env("QUOTEFORGE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("QUOTEFORGE_LOGGING_FORMAT").or_else(|| read_env("QUOTEFORGE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(directory) = overrides.template_directory {
            self.templates.directory = directory;
        }
        if let Some(default_template) = overrides.default_template {
            self.templates.default_template = Some(default_template);
        }
        if let Some(template_dir) = overrides.render_template_dir {
            self.render.template_dir = Some(template_dir);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_templates(&self.templates)?;
        validate_render(&self.render)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The config file `load` would read, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_templates(templates: &TemplateConfig) -> Result<(), ConfigError> {
    if templates.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation("templates.directory must not be empty".to_string()));
    }

    if let Some(default_template) = &templates.default_template {
        let id = default_template.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "templates.default must name a template id when set".to_string(),
            ));
        }
        if id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "templates.default `{id}` must be a bare template id, not a path"
            )));
        }
    }

    Ok(())
}

fn validate_render(render: &RenderConfig) -> Result<(), ConfigError> {
    if render.template_dir.as_ref().is_some_and(|dir| dir.as_os_str().is_empty()) {
        return Err(ConfigError::Validation(
            "render.template_dir must not be empty when set".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    templates: Option<TemplatesPatch>,
    render: Option<RenderPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct TemplatesPatch {
    directory: Option<PathBuf>,
    default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RenderPatch {
    template_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

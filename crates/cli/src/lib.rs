pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quoteforge_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

use crate::commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "quoteforge",
    about = "Quoteforge pricing and quote document CLI",
    long_about = "Price quotes, compose renderer-neutral quote documents, and render them to HTML.",
    after_help = "Examples:\n  quoteforge price --input quote.json\n  quoteforge compose --input quote.json --template compact\n  quoteforge render --input quote.json --output quote.html\n  quoteforge config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file to load instead of quoteforge.toml")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Override logging.format (compact|pretty|json)")]
    log_format: Option<String>,
    #[arg(long, global = true, help = "Override templates.directory")]
    templates_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a quote and print every derived amount as JSON")]
    Price {
        #[arg(long, help = "Quote record (JSON, or TOML with a .toml extension)")]
        input: PathBuf,
        #[arg(long, help = "Previously stored totals to check for drift")]
        check_totals: Option<PathBuf>,
    },
    #[command(about = "Price a quote and print the composed document as JSON")]
    Compose {
        #[arg(long, help = "Quote record (JSON, or TOML with a .toml extension)")]
        input: PathBuf,
        #[arg(long, help = "Template file path or template id")]
        template: Option<String>,
    },
    #[command(about = "Price, compose and render a quote to HTML")]
    Render {
        #[arg(long, help = "Quote record (JSON, or TOML with a .toml extension)")]
        input: PathBuf,
        #[arg(long, help = "Template file path or template id")]
        template: Option<String>,
        #[arg(long, help = "Write the HTML here instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> Result<LoadOptions, CommandResult> {
        let log_format = match self.log_format.as_deref().map(str::parse::<LogFormat>) {
            Some(Ok(format)) => Some(format),
            Some(Err(error)) => {
                return Err(CommandResult::failure(
                    "config",
                    "configuration",
                    error.to_string(),
                    commands::EXIT_IO,
                ))
            }
            None => None,
        };

        Ok(LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                template_directory: self.templates_dir.clone(),
                log_level: self.log_level.clone(),
                log_format,
                ..ConfigOverrides::default()
            },
        })
    }
}

pub fn run() -> ExitCode {
    let result = execute(Cli::parse());
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

pub fn execute(cli: Cli) -> CommandResult {
    let options = match cli.load_options() {
        Ok(options) => options,
        Err(failure) => return failure,
    };

    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "configuration",
                format!("config validation failed: {error}"),
                commands::EXIT_IO,
            )
        }
    };
    logging::init_logging(&config.logging);

    match cli.command {
        Command::Price { input, check_totals } => {
            commands::price::run(&input, check_totals.as_deref())
        }
        Command::Compose { input, template } => {
            commands::compose::run(&config, &input, template.as_deref())
        }
        Command::Render { input, template, output } => {
            commands::render::run(&config, &input, template.as_deref(), output.as_deref())
        }
        Command::Config => commands::config::run(&options),
    }
}

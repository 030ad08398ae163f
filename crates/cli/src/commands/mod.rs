pub mod compose;
pub mod config;
pub mod input;
pub mod price;
pub mod render;

use quoteforge_core::pricing::validate_quote;
use quoteforge_core::{ApplicationError, DomainError, Quote};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_IO: u8 = 1;
pub const EXIT_VALIDATION: u8 = 2;
pub const EXIT_INVARIANT: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::success_with(command, message, Some(data)),
            Err(error) => Self::failure(command, "serialization", error.to_string(), EXIT_IO),
        }
    }

    fn success_with(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with(command, error_class, message, exit_code, None)
    }

    fn failure_with(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), exit_code_for(error))
    }

    /// Reports every violation in the quote at once, so a caller can fix
    /// them all before retrying.
    pub fn invalid_quote(command: &str, quote: &Quote) -> Option<Self> {
        let violations = validate_quote(quote);
        if violations.is_empty() {
            return None;
        }

        let messages = violations.iter().map(ToString::to_string).collect::<Vec<_>>();
        let summary =
            format!("quote has {} invalid value(s): {}", messages.len(), messages.join("; "));
        Some(Self::failure_with(
            command,
            "validation",
            summary,
            EXIT_VALIDATION,
            Some(Value::from(messages)),
        ))
    }
}

pub fn exit_code_for(error: &ApplicationError) -> u8 {
    match error {
        ApplicationError::Domain(DomainError::InvariantViolation(_)) => EXIT_INVARIANT,
        ApplicationError::Domain(_) => EXIT_VALIDATION,
        ApplicationError::Input(_)
        | ApplicationError::Render(_)
        | ApplicationError::Configuration(_) => EXIT_IO,
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

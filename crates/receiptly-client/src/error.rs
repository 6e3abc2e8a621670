use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const SOURCE_HELP_COMMAND: &str = "receiptly list --help";
pub(crate) const SOURCE_HELP_SECTION_TITLE: &str = "Receipt Sources";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source_help(self) -> Self {
        self.with_source_help_data(json!({}))
    }

    pub fn with_source_help_data(self, data: Value) -> Self {
        self.with_data(merge_source_help_data(data))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `receiptly {cmd} --help` for usage."),
            None => "Run `receiptly --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_source_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_source_format",
            message,
            vec![
                "Provide a supported receipt source (JSON array or CSV with headers).".to_string(),
                "Run `receiptly list --help` to confirm field names.".to_string(),
            ],
        )
        .with_source_help_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "csv"],
        }))
    }

    pub fn source_schema_mismatch(allowed_headers: Vec<String>, actual_headers: Vec<String>) -> Self {
        Self::new(
            "source_schema_mismatch",
            "CSV headers do not match the receipt fields.",
            vec![
                "Include a `date` header; every other field is optional.".to_string(),
                "Do not include unknown headers.".to_string(),
                "Run `receiptly list --help` to review the receipt fields.".to_string(),
            ],
        )
        .with_source_help_data(json!({
            "required_headers": ["date"],
            "allowed_headers": allowed_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn source_unreadable(location: &str, detail: &str) -> Self {
        Self::new(
            "source_unreadable",
            &format!("Could not read receipt source `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Pass `--source <path>` or set `RECEIPTLY_HOME` to the directory holding receipts.json."
                    .to_string(),
            ],
        )
        .with_source_help_data(json!({
            "source": location,
        }))
    }

    pub fn receipt_not_found(receipt_id: &str) -> Self {
        Self::new(
            "receipt_not_found",
            &format!("Receipt id `{receipt_id}` was not found."),
            vec![
                "Run receiptly list to find a valid receipt id.".to_string(),
                "Retry with receiptly show <receipt_id>.".to_string(),
            ],
        )
        .with_data(json!({
            "receipt_id": receipt_id,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn home_unresolved(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "home_unresolved",
            &format!("Cannot resolve receipt home at `{location}`: {detail}"),
            vec!["Set `RECEIPTLY_HOME` to a readable directory.".to_string()],
        )
    }
}

fn merge_source_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(SOURCE_HELP_COMMAND.to_string()),
        );
        object.insert(
            "help_section_title".to_string(),
            Value::String(SOURCE_HELP_SECTION_TITLE.to_string()),
        );
    }

    data
}

pub type ClientResult<T> = Result<T, ClientError>;

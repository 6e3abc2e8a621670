pub(crate) mod input;
pub(crate) mod parse;

use std::path::Path;

use crate::extract::{self, MailMessage};
use crate::receipts::types::Receipt;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct LoadedReceipts {
    pub(crate) receipts: Vec<Receipt>,
    pub(crate) source_kind: &'static str,
    pub(crate) source_ref: Option<String>,
}

/// Resolves and parses the receipt source for a command.
pub(crate) fn load_receipts(
    path: Option<String>,
    stdin_override: Option<String>,
    home_override: Option<&Path>,
) -> ClientResult<LoadedReceipts> {
    let resolved = input::resolve_source(path, stdin_override, home_override)?;
    let receipts = parse::parse_source(&resolved.content)?;
    tracing::debug!(
        source_kind = resolved.source_kind.as_str(),
        receipts = receipts.len(),
        "loaded receipt source"
    );

    Ok(LoadedReceipts {
        receipts,
        source_kind: resolved.source_kind.as_str(),
        source_ref: resolved.source_ref,
    })
}

#[derive(Debug, Clone)]
pub(crate) struct LoadedMessages {
    pub(crate) messages: Vec<MailMessage>,
    pub(crate) source_kind: &'static str,
    pub(crate) source_ref: Option<String>,
}

/// Reads fetched mail messages from a file or stdin (`-`).
pub(crate) fn load_messages(
    path: String,
    stdin_override: Option<String>,
) -> ClientResult<LoadedMessages> {
    let resolved = input::resolve_explicit(path, stdin_override)?;
    let messages = extract::parse_messages(&resolved.content)?;
    tracing::debug!(
        source_kind = resolved.source_kind.as_str(),
        messages = messages.len(),
        "loaded mail messages"
    );

    Ok(LoadedMessages {
        messages,
        source_kind: resolved.source_kind.as_str(),
        source_ref: resolved.source_ref,
    })
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide a JSON array or CSV of receipts via path or stdin (`-`).".to_string(),
            "Run `receiptly list --help` to confirm receipt field names.".to_string(),
        ],
    )
    .with_source_help()
}

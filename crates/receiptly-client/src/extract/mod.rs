pub mod message;
pub mod patterns;

use serde_json::Value;

use crate::receipts::types::Receipt;
use crate::{ClientError, ClientResult};

pub use message::{MailMessage, MessageRejection, receipt_from_message};

#[derive(Debug, Clone, Default)]
pub struct ExtractOutcome {
    pub receipts: Vec<Receipt>,
    pub messages_read: usize,
    pub not_receipts: usize,
    pub missing_total: usize,
}

pub fn parse_messages(content: &str) -> ClientResult<Vec<MailMessage>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let parsed = serde_json::from_str::<Value>(trimmed).map_err(|_| {
        ClientError::invalid_source_format(
            "Message input must be a JSON array of mail messages.",
            "unknown",
        )
    })?;
    if !parsed.is_array() {
        return Err(ClientError::invalid_source_format(
            "Message input must be a top-level JSON array of mail messages.",
            "json_non_array",
        ));
    }

    serde_json::from_value::<Vec<MailMessage>>(parsed).map_err(|error| {
        ClientError::invalid_argument_with_recovery(
            &format!("Mail messages are malformed: {error}"),
            vec![
                "Each message needs an `id`; `snippet` and `payload` are optional.".to_string(),
                "Run `receiptly extract --help` for the expected message shape.".to_string(),
            ],
        )
    })
}

/// Keeps the messages that read as receipts with a total, in input order.
pub fn extract_receipts(messages: &[MailMessage]) -> ExtractOutcome {
    let mut outcome = ExtractOutcome {
        messages_read: messages.len(),
        ..ExtractOutcome::default()
    };

    for message in messages {
        match receipt_from_message(message) {
            Ok(receipt) => outcome.receipts.push(receipt),
            Err(MessageRejection::NotReceipt) => outcome.not_receipts += 1,
            Err(MessageRejection::MissingTotal) => outcome.missing_total += 1,
        }
    }

    tracing::info!(
        messages = outcome.messages_read,
        receipts = outcome.receipts.len(),
        not_receipts = outcome.not_receipts,
        missing_total = outcome.missing_total,
        "extracted receipts from messages"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::{extract_receipts, parse_messages};

    #[test]
    fn messages_without_bodies_are_not_receipts() {
        let parsed = parse_messages(r#"[{"id": "a"}, {"id": "b", "snippet": "Your receipt"}]"#);
        assert!(parsed.is_ok());
        if let Ok(messages) = parsed {
            let outcome = extract_receipts(&messages);
            assert_eq!(outcome.messages_read, 2);
            assert_eq!(outcome.not_receipts, 1);
            assert_eq!(outcome.missing_total, 1);
            assert!(outcome.receipts.is_empty());
        }
    }

    #[test]
    fn non_array_input_is_rejected() {
        let parsed = parse_messages(r#"{"messages": []}"#);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "invalid_source_format");
        }
    }
}

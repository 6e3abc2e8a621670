use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::DateTime;
use serde::Deserialize;

use crate::extract::patterns::{extract_total, looks_like_receipt, parse_sender};
use crate::receipts::date::format_display_date;
use crate::receipts::types::Receipt;

const MAIL_LINK_PREFIX: &str = "https://mail.google.com/mail/u/0/#inbox/";
const NO_CONTENT: &str = "No readable content found.";

const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A fetched mail message, shaped like a Gmail API `users.messages.get`
/// response in `full` format.
#[derive(Debug, Clone, Deserialize)]
pub struct MailMessage {
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub payload: MailPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailPayload {
    #[serde(default)]
    pub headers: Vec<MailHeader>,
    #[serde(default)]
    pub body: MailBody,
    #[serde(default)]
    pub parts: Vec<MailPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailBody {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, rename = "attachmentId")]
    pub attachment_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailPart {
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub body: MailBody,
}

impl MailMessage {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }

    pub fn has_pdf_attachment(&self) -> bool {
        self.payload.parts.iter().any(|part| {
            part.mime_type == "application/pdf"
                && !part.filename.is_empty()
                && part.body.attachment_id.is_some()
        })
    }

    /// The decoded top-level body, or the first `text/plain` part.
    pub fn body_text(&self) -> Option<String> {
        let top_level = self
            .payload
            .body
            .data
            .as_deref()
            .filter(|data| !data.is_empty());
        let encoded = match top_level {
            Some(data) => Some(data),
            None => self
                .payload
                .parts
                .iter()
                .filter(|part| part.mime_type == "text/plain")
                .find_map(|part| part.body.data.as_deref().filter(|data| !data.is_empty())),
        }?;

        match BODY_ENGINE.decode(encoded.trim()) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(error) => {
                tracing::debug!(message_id = %self.id, %error, "message body is not base64url");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRejection {
    NotReceipt,
    MissingTotal,
}

/// Turns one message into a receipt, or says why it was rejected.
pub fn receipt_from_message(message: &MailMessage) -> Result<Receipt, MessageRejection> {
    let has_pdf = message.has_pdf_attachment();
    let body = message.body_text();
    let searchable_body = body.as_deref().unwrap_or(NO_CONTENT);

    if !looks_like_receipt(searchable_body, &message.snippet, has_pdf) {
        return Err(MessageRejection::NotReceipt);
    }

    let Some(total) = body.as_deref().and_then(extract_total) else {
        return Err(MessageRejection::MissingTotal);
    };

    let sender = parse_sender(message.header("from"), &message.snippet);
    let snippet = if message.snippet.is_empty() {
        None
    } else {
        Some(message.snippet.clone())
    };

    Ok(Receipt {
        id: message.id.clone(),
        sender_name: sender.name,
        sender_email: sender.email,
        date: normalize_message_date(message.header("date")),
        total: Some(total),
        snippet,
        link: Some(format!("{MAIL_LINK_PREFIX}{}", message.id)),
        has_pdf,
    })
}

/// Reformats an RFC 2822 `Date` header as `DD Mon YYYY`; other text is kept.
pub fn normalize_message_date(header: Option<&str>) -> String {
    let Some(raw) = header else {
        return String::new();
    };
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(parsed) => format_display_date(&parsed.date_naive()),
        Err(_) => raw.to_string(),
    }
}

use std::sync::LazyLock;

use regex::Regex;

const RECEIPT_KEYWORDS: [&str; 4] = ["total", "amount paid", "transaction id", "order id"];

static TOTAL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(total|paid|total net|total\(cad\)|total \(cad\)|total\(usd\)|total \(usd\)|totalcad|totalusd|total cad|total usd)\b[\s:]*[$]?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{2}))",
    )
    .ok()
});

static MERCHANT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"at\s+([A-Z][a-zA-Z]*(?:\s+[A-Z][a-zA-Z]*)*)").ok());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Splits a `From` header into display name and address.
///
/// `Name <address>` yields both; anything else is taken as the address.
/// Without a display name, a merchant named after "at" in the snippet
/// stands in for it.
pub fn parse_sender(from_header: Option<&str>, snippet: &str) -> SenderInfo {
    let mut sender = SenderInfo::default();

    if let Some(raw) = from_header {
        match raw.split_once('<') {
            Some((name, rest)) if rest.contains('>') => {
                let name = name.trim().trim_matches('"').trim();
                if !name.is_empty() {
                    sender.name = Some(name.to_string());
                }
                let email = rest.replace('>', "");
                let email = email.trim();
                if !email.is_empty() {
                    sender.email = Some(email.to_string());
                }
            }
            _ => {
                let email = raw.trim();
                if !email.is_empty() {
                    sender.email = Some(email.to_string());
                }
            }
        }
    }

    if sender.name.is_none() {
        sender.name = merchant_from_snippet(snippet);
    }

    sender
}

pub fn merchant_from_snippet(snippet: &str) -> Option<String> {
    let pattern = MERCHANT_PATTERN.as_ref()?;
    pattern
        .captures(snippet)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().trim().to_string())
}

/// First amount following a total-like label, e.g. `Total: $1,234.56`.
pub fn extract_total(text: &str) -> Option<String> {
    let pattern = TOTAL_PATTERN.as_ref()?;
    pattern
        .captures_iter(text)
        .find_map(|captures| captures.get(2))
        .map(|found| found.as_str().to_string())
}

pub fn looks_like_receipt(body: &str, snippet: &str, has_pdf: bool) -> bool {
    let body = body.to_lowercase();
    RECEIPT_KEYWORDS.iter().any(|keyword| body.contains(keyword))
        || snippet.to_lowercase().contains("receipt")
        || has_pdf
}

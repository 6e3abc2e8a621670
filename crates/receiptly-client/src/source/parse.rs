use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::receipts::types::Receipt;
use crate::source::invalid_input_error;
use crate::{ClientError, ClientResult};

/// Accepted field names, each with its camelCase alias where one exists.
const RECEIPT_FIELDS: [(&str, Option<&str>); 8] = [
    ("id", None),
    ("sender_name", Some("senderName")),
    ("sender_email", Some("senderEmail")),
    ("date", None),
    ("total", None),
    ("snippet", Some("details")),
    ("receipt_link", Some("link")),
    ("has_pdf", Some("hasPdf")),
];

/// Parses a JSON array or CSV receipt source.
///
/// The saved `--json` output of `receiptly extract` is accepted as well.
/// Empty input is valid and yields no receipts.
pub(crate) fn parse_source(content: &str) -> ClientResult<Vec<Receipt>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if looks_like_ndjson(trimmed) {
        return Err(ClientError::invalid_source_format(
            "NDJSON is not supported. Provide a JSON array or CSV.",
            "ndjson",
        ));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(items) = extract_envelope_receipts(&value) {
            return receipts_from_items(items);
        }
        return Err(ClientError::invalid_source_format(
            "JSON input must be a top-level array of receipt objects.",
            "json_non_array",
        ));
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    Err(ClientError::invalid_source_format(
        "Unsupported receipt source. Provide a JSON array or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> ClientResult<Vec<Receipt>> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_input_error("Invalid JSON input. Provide a valid JSON array."))?;

    let Some(items) = parsed.as_array() else {
        return Err(invalid_input_error(
            "JSON input must be a top-level array of receipt objects.",
        ));
    };

    receipts_from_items(items)
}

/// The `data.receipts` array of an `extract` success envelope.
fn extract_envelope_receipts(value: &Value) -> Option<&Vec<Value>> {
    let object = value.as_object()?;
    if object.get("command").and_then(Value::as_str) != Some("extract") {
        return None;
    }
    object.get("data")?.get("receipts")?.as_array()
}

fn receipts_from_items(items: &[Value]) -> ClientResult<Vec<Receipt>> {
    let mut receipts = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(invalid_input_error(
                "JSON array entries must all be objects with receipt fields.",
            ));
        };

        let field = |name: &str| read_optional_string(lookup(object, name));
        receipts.push(Receipt {
            id: non_empty(field("id")).unwrap_or_else(|| positional_id(index)),
            sender_name: non_empty(field("sender_name")),
            sender_email: non_empty(field("sender_email")),
            date: field("date").unwrap_or_default(),
            total: non_empty(field("total")),
            snippet: non_empty(field("snippet")),
            link: non_empty(field("receipt_link")),
            has_pdf: read_flag(lookup(object, "has_pdf")),
        });
    }

    Ok(receipts)
}

fn parse_csv(content: &str) -> ClientResult<Vec<Receipt>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let canonical_headers = headers
        .iter()
        .map(|header| canonical_field_name(header))
        .collect::<Option<Vec<&str>>>();
    let Some(canonical_headers) = canonical_headers else {
        return Err(ClientError::source_schema_mismatch(allowed_headers(), headers));
    };
    if !canonical_headers.contains(&"date") {
        return Err(ClientError::source_schema_mismatch(allowed_headers(), headers));
    }

    let index_by_name = canonical_headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect::<HashMap<String, usize>>();

    let mut receipts = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record =
            result_row.map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8."))?;
        let field = |name: &str| value_for(&record, &index_by_name, name);

        receipts.push(Receipt {
            id: non_empty(field("id")).unwrap_or_else(|| positional_id(row_index)),
            sender_name: non_empty(field("sender_name")),
            sender_email: non_empty(field("sender_email")),
            date: field("date").unwrap_or_default(),
            total: non_empty(field("total")),
            snippet: non_empty(field("snippet")),
            link: non_empty(field("receipt_link")),
            has_pdf: field("has_pdf")
                .map(|value| parse_flag_text(&value))
                .unwrap_or(false),
        });
    }

    Ok(receipts)
}

fn positional_id(index: usize) -> String {
    format!("rcpt_{}", index + 1)
}

fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(name) {
        return Some(value);
    }
    let alias = RECEIPT_FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .and_then(|(_, alias)| *alias)?;
    object.get(alias)
}

fn canonical_field_name(header: &str) -> Option<&'static str> {
    RECEIPT_FIELDS
        .iter()
        .find(|(field, alias)| *field == header || *alias == Some(header))
        .map(|(field, _)| *field)
}

fn allowed_headers() -> Vec<String> {
    RECEIPT_FIELDS
        .iter()
        .map(|(field, _)| field.to_string())
        .collect()
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    let value = record.get(*index)?;
    Some(value.to_string())
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;

    if current.is_null() {
        return None;
    }

    if let Some(string_value) = current.as_str() {
        return Some(string_value.to_string());
    }

    // Numbers keep their source text (`23.10` stays `23.10`).
    if let Value::Number(number_value) = current {
        return Some(number_value.to_string());
    }

    Some(current.to_string())
}

fn read_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => parse_flag_text(text),
        Some(Value::Number(number)) => number.as_i64().is_some_and(|value| value != 0),
        _ => false,
    }
}

fn parse_flag_text(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn looks_like_ndjson(content: &str) -> bool {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();
    if lines.len() < 2 {
        return false;
    }

    lines.iter().all(|line| {
        let parsed = serde_json::from_str::<Value>(line.trim());
        if let Ok(value) = parsed {
            return value.is_object();
        }
        false
    })
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',') || canonical_field_name(first_line.trim()).is_some()
}

use std::io;

use serde_json::{Map, Value};

use super::format::{self, Align, Column};

const RECEIPT_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "ID",
        align: Align::Left,
    },
    Column {
        name: "Date",
        align: Align::Left,
    },
    Column {
        name: "Sender",
        align: Align::Left,
    },
    Column {
        name: "Total",
        align: Align::Right,
    },
    Column {
        name: "PDF",
        align: Align::Left,
    },
];

pub fn render_list(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("list output requires summary"))?;
    let sections = data
        .get("sections")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("list output requires sections"))?;
    let hide_empty = data
        .get("hide_empty")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = vec![list_heading(data)];
    let receipts_read = get_u64(summary, "receipts_read");
    if receipts_read == 0 {
        lines.push("No receipts found.".to_string());
    } else {
        lines.push(format!(
            "{} of {receipts_read} receipts shown.",
            get_u64(summary, "matched")
        ));
    }

    for section in sections {
        let count = section.get("count").and_then(Value::as_u64).unwrap_or(0);
        if hide_empty && count == 0 {
            continue;
        }
        let label = section.get("label").and_then(Value::as_str).unwrap_or("");
        lines.push(String::new());
        lines.push(format!("{label} ({count})"));

        let rows = section
            .get("receipts")
            .and_then(Value::as_array)
            .map(|receipts| receipts.iter().map(receipt_row).collect::<Vec<_>>())
            .unwrap_or_default();
        if rows.is_empty() {
            lines.push("  No receipts.".to_string());
        } else {
            lines.extend(format::render_table(&RECEIPT_COLUMNS, &rows, 2));
        }
    }

    lines.extend(render_skipped(data));
    Ok(lines.join("\n"))
}

pub fn render_show(data: &Value) -> io::Result<String> {
    let receipt = data
        .get("receipt")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("show output requires receipt"))?;

    let date = match receipt.get("date_iso").and_then(Value::as_str) {
        Some(iso) => format!("{} ({iso})", text(receipt, "date")),
        None => format!("{} (unreadable)", text(receipt, "date")),
    };
    let sender = match receipt.get("sender_email").and_then(Value::as_str) {
        Some(email) => format!("{} <{email}>", text(receipt, "sender_name")),
        None => text(receipt, "sender_name"),
    };

    let entries = vec![
        ("ID:", text(receipt, "id")),
        ("Sender:", sender),
        ("Date:", date),
        ("Total:", text(receipt, "total")),
        ("PDF:", yes_no(receipt.get("has_pdf"))),
        ("Link:", text(receipt, "link")),
    ];

    let mut lines = vec!["Receipt".to_string()];
    lines.extend(format::key_value_rows(&entries, 2));
    if let Some(snippet) = receipt.get("snippet").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("  {snippet}"));
    }
    Ok(lines.join("\n"))
}

pub fn render_extract(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("extract output requires summary"))?;

    let mut lines = vec!["Extraction complete.".to_string(), String::new()];
    lines.push("Summary:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Messages read:", get_u64(summary, "messages_read").to_string()),
            ("Receipts:", get_u64(summary, "receipts").to_string()),
            ("Not receipts:", get_u64(summary, "not_receipts").to_string()),
            ("No total found:", get_u64(summary, "missing_total").to_string()),
        ],
        2,
    ));

    let rows = data
        .get("receipts")
        .and_then(Value::as_array)
        .map(|receipts| receipts.iter().map(receipt_row).collect::<Vec<_>>())
        .unwrap_or_default();
    if !rows.is_empty() {
        lines.push(String::new());
        lines.extend(format::render_table(&RECEIPT_COLUMNS, &rows, 2));
    }

    lines.push(String::new());
    lines.push("Run with --json and save the output to use it as a receipt source.".to_string());
    Ok(lines.join("\n"))
}

fn list_heading(data: &Value) -> String {
    let reference_day = data
        .get("reference_day")
        .and_then(Value::as_str)
        .unwrap_or("");
    let grouping = data.get("grouping").and_then(Value::as_str).unwrap_or("");
    let query = data.get("query").and_then(Value::as_str).unwrap_or("");
    if query.is_empty() {
        format!("Receipts as of {reference_day} ({grouping})")
    } else {
        format!("Receipts matching \"{query}\" as of {reference_day} ({grouping})")
    }
}

fn render_skipped(data: &Value) -> Vec<String> {
    let Some(skipped) = data.get("skipped").and_then(Value::as_object) else {
        return Vec::new();
    };
    let count = get_u64(skipped, "count");
    if count == 0 {
        return Vec::new();
    }

    let ids = skipped
        .get("ids")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default();
    let noun = if count == 1 { "receipt" } else { "receipts" };
    vec![
        String::new(),
        format!("Skipped {count} {noun} with an unreadable date: {ids}"),
    ]
}

fn receipt_row(receipt: &Value) -> Vec<String> {
    let field = |name: &str| {
        receipt
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };
    let pdf = if receipt.get("has_pdf").and_then(Value::as_bool).unwrap_or(false) {
        "yes".to_string()
    } else {
        String::new()
    };
    vec![
        field("id"),
        field("date"),
        field("sender_name"),
        field("total"),
        pdf,
    ]
}

fn text(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

fn yes_no(value: Option<&Value>) -> String {
    if value.and_then(Value::as_bool).unwrap_or(false) {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

fn get_u64(object: &Map<String, Value>, key: &str) -> u64 {
    object.get(key).and_then(Value::as_u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_extract, render_list, render_show};

    fn list_payload(hide_empty: bool) -> serde_json::Value {
        json!({
            "grouping": "rolling",
            "reference_day": "2024-10-18",
            "query": "",
            "hide_empty": hide_empty,
            "summary": {"receipts_read": 3, "matched": 2, "sections": 2, "empty_sections": 1},
            "sections": [
                {"label": "Today", "count": 2, "receipts": [
                    {"id": "r1", "date": "18 Oct 2024", "sender_name": "Uber", "total": "23.10", "has_pdf": true},
                    {"id": "r2", "date": "2024-10-18", "sender_name": null, "total": null, "has_pdf": false}
                ]},
                {"label": "Yesterday", "count": 0, "receipts": []}
            ],
            "skipped": {"count": 1, "ids": ["bad"], "reason": "date could not be parsed"}
        })
    }

    #[test]
    fn list_renders_every_section_with_counts() {
        let rendered = render_list(&list_payload(false));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Receipts as of 2024-10-18 (rolling)"));
            assert!(text.contains("2 of 3 receipts shown."));
            assert!(text.contains("Today (2)"));
            assert!(text.contains("Yesterday (0)\n  No receipts."));
            assert!(text.contains("Skipped 1 receipt with an unreadable date: bad"));
            let today = text.find("  r1").unwrap_or(usize::MAX);
            let second = text.find("  r2").unwrap_or(0);
            assert!(today < second);
        }
    }

    #[test]
    fn list_hides_empty_sections_on_request() {
        let rendered = render_list(&list_payload(true));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Today (2)"));
            assert!(!text.contains("Yesterday"));
        }
    }

    #[test]
    fn show_renders_fields_and_snippet() {
        let rendered = render_show(&json!({
            "source": {"kind": "file", "reference": "r.json"},
            "receipt": {
                "id": "r1", "sender_name": "Uber", "sender_email": "noreply@uber.com",
                "date": "18 Oct 2024", "date_iso": "2024-10-18", "total": "23.10",
                "snippet": "Thanks for riding", "link": null, "has_pdf": false
            }
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Uber <noreply@uber.com>"));
            assert!(text.contains("18 Oct 2024 (2024-10-18)"));
            assert!(text.contains("Link:    -"));
            assert!(text.ends_with("  Thanks for riding"));
        }
    }

    #[test]
    fn extract_renders_summary_counts() {
        let rendered = render_extract(&json!({
            "source": {"kind": "stdin"},
            "summary": {"messages_read": 3, "receipts": 1, "not_receipts": 1, "missing_total": 1},
            "receipts": [{"id": "m1", "date": "18 Oct 2024", "sender_name": "Uber", "total": "23.10", "has_pdf": false}]
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Messages read:   3"));
            assert!(text.contains("No total found:  1"));
            assert!(text.contains("  m1"));
        }
    }
}

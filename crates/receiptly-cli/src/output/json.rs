use std::io;

use receiptly_client::contracts::envelope::failure_from_error;
use receiptly_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::Value;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "list" => {
            let mut envelope = success.clone();
            drop_hidden_sections(&mut envelope.data);
            serialize_json_pretty(&envelope)
        }
        "show" | "extract" => serialize_json_pretty(success),
        _ => Err(io::Error::other(format!(
            "JSON output is not supported for command `{}`",
            success.command
        ))),
    }
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

/// Applies `hide_empty` to a list payload; the summary keeps full counts.
fn drop_hidden_sections(data: &mut Value) {
    let hide_empty = data
        .get("hide_empty")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !hide_empty {
        return;
    }
    if let Some(sections) = data.get_mut("sections").and_then(Value::as_array_mut) {
        sections.retain(|section| section.get("count").and_then(Value::as_u64).unwrap_or(0) > 0);
    }
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use receiptly_client::{ClientError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    fn success(command: &str, data: Value) -> SuccessEnvelope {
        SuccessEnvelope {
            ok: true,
            command: command.to_string(),
            version: "0.1.0".to_string(),
            data,
        }
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or(Value::Null)
    }

    #[test]
    fn list_json_keeps_empty_sections_unless_hidden() {
        let data = json!({
            "hide_empty": false,
            "sections": [
                {"label": "Today", "count": 1, "receipts": [{"id": "r1"}]},
                {"label": "Yesterday", "count": 0, "receipts": []}
            ]
        });
        let rendered = render_success_json(&success("list", data.clone()));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert_eq!(value["ok"], Value::Bool(true));
            assert_eq!(value["data"]["sections"].as_array().map(Vec::len), Some(2));
        }

        let mut hidden = data;
        hidden["hide_empty"] = Value::Bool(true);
        let rendered = render_success_json(&success("list", hidden));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert_eq!(value["data"]["sections"].as_array().map(Vec::len), Some(1));
            assert_eq!(value["data"]["sections"][0]["label"], "Today");
        }
    }

    #[test]
    fn error_json_uses_failure_envelope() {
        let error = ClientError::receipt_not_found("r9");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert_eq!(value["ok"], Value::Bool(false));
            assert_eq!(value["error"]["code"], "receipt_not_found");
            assert_eq!(value["data"]["receipt_id"], "r9");
        }
    }
}

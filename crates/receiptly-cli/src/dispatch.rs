use receiptly_client::commands;
use receiptly_client::commands::list::ListRequest;
use receiptly_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::List {
            source,
            query,
            group,
            months,
            today,
            search_snippets,
            hide_empty,
            json: _,
        } => commands::list::run(ListRequest {
            path: source.clone(),
            query: query.clone(),
            grouping: group.clone(),
            trailing_months: *months,
            today: today.as_ref().map(|value| value.as_str().to_string()),
            search_snippets: *search_snippets,
            hide_empty: *hide_empty,
        }),
        Commands::Show {
            receipt_id, source, ..
        } => commands::show::run(receipt_id.clone(), source.clone()),
        Commands::Extract { path, .. } => commands::extract::run(path.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn dispatches_to_expected_command_names() {
        let temp = tempfile::tempdir();
        assert!(temp.is_ok());
        let Ok(dir) = temp else {
            return;
        };
        let receipts_path = dir.path().join("receipts.json");
        let messages_path = dir.path().join("messages.json");
        assert!(fs::write(&receipts_path, r#"[{"id": "r1", "date": "2024-10-18"}]"#).is_ok());
        assert!(fs::write(&messages_path, "[]").is_ok());
        let receipts = receipts_path.display().to_string();
        let messages = messages_path.display().to_string();

        let cases: [(Vec<&str>, &str); 3] = [
            (
                vec!["receiptly", "list", "--source", &receipts, "--today", "2024-10-18"],
                "list",
            ),
            (vec!["receiptly", "show", "r1", "--source", &receipts], "show"),
            (vec!["receiptly", "extract", &messages], "extract"),
        ];

        for (args, expected_command) in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.command, expected_command);
                }
            }
        }
    }

    #[test]
    fn unknown_receipt_id_is_reported() {
        let temp = tempfile::tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let path = dir.path().join("receipts.csv");
            assert!(fs::write(&path, "id,date\nr1,2024-10-18\n").is_ok());
            let source = path.display().to_string();
            let parsed = parse_from(["receiptly", "show", "nope", "--source", &source]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_err());
                if let Err(error) = response {
                    assert_eq!(error.code, "receipt_not_found");
                }
            }
        }
    }
}

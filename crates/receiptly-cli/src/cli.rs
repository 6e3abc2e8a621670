use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shaped {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_grouping(value: &str) -> Result<String, String> {
    match value.to_ascii_lowercase().as_str() {
        "rolling" => Ok("rolling".to_string()),
        "monthly" | "month" => Ok("monthly".to_string()),
        _ => Err("grouping must be one of: rolling, monthly".to_string()),
    }
}

pub const LIST_AFTER_HELP: &str = "\
Sections:
  rolling (default), relative to --today:
    Today, Yesterday, Previous 7 Days, Previous 30 Days, Older than 30 Days
  monthly:
    one section per calendar month, newest first, e.g. `October 2024`.
    With --months N, months before the last N collapse into `Earlier`.

  Every section is listed even when empty. Pass --hide-empty to drop them.
  Receipts in a section are newest first; equal dates keep source order.

Receipt Sources:
  With no --source, receipts are read from `$RECEIPTLY_HOME/receipts.json`
  (default home: ~/.receiptly). A missing default file means no receipts.
  Use `--source -` to read stdin.

  JSON example (one top-level array):
  [
    {
      \"id\": \"18f0a\",
      \"sender_name\": \"Uber\",
      \"sender_email\": \"noreply@uber.com\",
      \"date\": \"18 Oct 2024\",
      \"total\": \"23.10\",
      \"snippet\": \"Thanks for riding\",
      \"receipt_link\": \"https://mail.google.com/mail/u/0/#inbox/18f0a\",
      \"has_pdf\": false
    }
  ]

  The saved output of `receiptly extract ... --json` is accepted as is.
  CSV uses the same names as headers; only `date` is required.
  Dates may be `DD Mon YYYY`, `YYYY-MM-DD`, RFC 2822 or RFC 3339.
  Receipts whose date cannot be read are skipped and counted.

Search:
  --query matches sender name and date text, ignoring case.
  Add --search-snippets to match the snippet too.
";

pub const EXTRACT_AFTER_HELP: &str = "\
Input:
  A JSON array of mail messages in Gmail API `full` format:
  [{\"id\": \"...\", \"snippet\": \"...\", \"payload\": {\"headers\": [...], \"body\": {...}, \"parts\": [...]}}]

  A message is kept when its body mentions a total, amount paid, order id or
  transaction id, its snippet says `receipt`, or it carries a PDF attachment,
  and a total amount can be read from the body.

What to do next:
  receiptly extract messages.json --json > ~/.receiptly/receipts.json
  receiptly list
";

#[derive(Debug, Parser)]
#[command(
    name = "receiptly",
    version,
    about = "receipt inbox organiser",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List receipts grouped into date sections
    #[command(after_long_help = LIST_AFTER_HELP)]
    List {
        /// Receipt source: a JSON or CSV file, or `-` for stdin
        #[arg(long)]
        source: Option<String>,
        /// Case-insensitive search over sender name and date text
        #[arg(long, short = 'q')]
        query: Option<String>,
        /// Section layout: rolling or monthly
        #[arg(long, value_parser = parse_grouping)]
        group: Option<String>,
        /// With monthly grouping, keep only the newest N months
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        months: Option<u32>,
        /// Reference day (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Also search receipt snippets
        #[arg(long)]
        search_snippets: bool,
        /// Leave out sections with no receipts
        #[arg(long)]
        hide_empty: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show every field of one receipt
    Show {
        /// The receipt id (e.g. 18f0a or rcpt_3)
        receipt_id: String,
        /// Receipt source: a JSON or CSV file, or `-` for stdin
        #[arg(long)]
        source: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Pull receipts out of fetched mail messages
    #[command(after_long_help = EXTRACT_AFTER_HELP)]
    Extract {
        /// Path to a JSON array of messages (use `-` for stdin)
        path: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{Commands, IsoDate, parse_from};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 10] = [
            vec!["receiptly", "list"],
            vec!["receiptly", "list", "--json"],
            vec!["receiptly", "list", "--query", "uber"],
            vec!["receiptly", "list", "-q", "oct 2024", "--search-snippets"],
            vec!["receiptly", "list", "--group", "monthly", "--months", "6"],
            vec!["receiptly", "list", "--source", "-", "--today", "2024-10-18"],
            vec!["receiptly", "list", "--hide-empty"],
            vec!["receiptly", "show", "rcpt_1"],
            vec!["receiptly", "show", "18f0a", "--source", "./r.csv", "--json"],
            vec!["receiptly", "extract", "-", "--json"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn list_flags_are_captured() {
        let parsed = parse_from([
            "receiptly",
            "list",
            "--group",
            "Month",
            "--today",
            "2024-10-18",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(cli.command, Commands::List { .. }));
            if let Commands::List {
                group,
                today,
                json,
                hide_empty,
                ..
            } = cli.command
            {
                assert_eq!(group.as_deref(), Some("monthly"));
                assert_eq!(today, Some(IsoDate("2024-10-18".to_string())));
                assert!(json);
                assert!(!hide_empty);
            }
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases: [Vec<&str>; 5] = [
            vec!["receiptly", "list", "--today", "2024-02-30"],
            vec!["receiptly", "list", "--today", "18 Oct 2024"],
            vec!["receiptly", "list", "--group", "weekly"],
            vec!["receiptly", "list", "--months", "0"],
            vec!["receiptly", "extract"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_err(), "unexpectedly parsed: {case:?}");
        }
    }

    #[test]
    fn show_requires_an_id() {
        let parsed = parse_from(["receiptly", "show"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn help_command_is_rejected() {
        let parsed = parse_from(["receiptly", "help"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn list_help_uses_clap_display_help() {
        let parsed = parse_from(["receiptly", "list", "--help"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}

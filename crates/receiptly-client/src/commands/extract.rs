use crate::ClientResult;
use crate::commands::common::source_info;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ExtractData, ExtractSummary};
use crate::extract::extract_receipts;
use crate::source::load_messages;

#[derive(Debug, Default)]
pub struct ExtractRunOptions {
    pub path: String,
    pub stdin_override: Option<String>,
}

pub fn run(path: String) -> ClientResult<SuccessEnvelope> {
    run_with_options(ExtractRunOptions {
        path,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ExtractRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_messages(options.path, options.stdin_override)?;
    let outcome = extract_receipts(&loaded.messages);

    let data = ExtractData {
        source: source_info(loaded.source_kind, loaded.source_ref),
        summary: ExtractSummary {
            messages_read: outcome.messages_read,
            receipts: outcome.receipts.len(),
            not_receipts: outcome.not_receipts,
            missing_total: outcome.missing_total,
        },
        receipts: outcome.receipts,
    };
    success("extract", data)
}

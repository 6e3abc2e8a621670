use std::path::Path;

use crate::commands::common::source_info;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ReceiptDetail, ReceiptShowData};
use crate::receipts::date::{format_iso_date, parse_receipt_date};
use crate::receipts::find_receipt;
use crate::source::load_receipts;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ShowRunOptions<'a> {
    pub id: String,
    pub path: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(id: String, path: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ShowRunOptions {
        id,
        path,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ShowRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.id.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "A receipt id is required.",
            Some("show"),
        ));
    }

    let loaded = load_receipts(options.path, options.stdin_override, options.home_override)?;
    let Some(receipt) = find_receipt(&loaded.receipts, &options.id) else {
        return Err(ClientError::receipt_not_found(&options.id));
    };

    let detail = ReceiptDetail {
        id: receipt.id.clone(),
        sender_name: receipt.sender_name.clone(),
        sender_email: receipt.sender_email.clone(),
        date: receipt.date.clone(),
        date_iso: parse_receipt_date(&receipt.date).map(|date| format_iso_date(&date)),
        total: receipt.total.clone(),
        snippet: receipt.snippet.clone(),
        link: receipt.link.clone(),
        has_pdf: receipt.has_pdf,
    };

    success(
        "show",
        ReceiptShowData {
            source: source_info(loaded.source_kind, loaded.source_ref),
            receipt: detail,
        },
    )
}

use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{resolve_grouping, resolve_reference_day, source_info};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    ReceiptListData, ReceiptListSummary, ReceiptSummary, SectionData, SkippedData, SourceInfo,
};
use crate::receipts::{Classification, SearchQuery, classify};
use crate::source::load_receipts;

const SKIPPED_REASON: &str = "date could not be parsed";

/// What `receiptly list` was asked to show.
#[derive(Debug, Default, Clone)]
pub struct ListRequest {
    pub path: Option<String>,
    pub query: Option<String>,
    pub grouping: Option<String>,
    pub trailing_months: Option<u32>,
    /// `YYYY-MM-DD`; defaults to the local calendar day.
    pub today: Option<String>,
    pub search_snippets: bool,
    pub hide_empty: bool,
}

#[derive(Debug, Default)]
pub struct ListRunOptions<'a> {
    pub request: ListRequest,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(request: ListRequest) -> ClientResult<SuccessEnvelope> {
    run_with_options(ListRunOptions {
        request,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ListRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let request = options.request;
    // Argument errors surface before any source is read.
    let reference = resolve_reference_day(request.today.as_deref(), "list")?;
    let grouping = resolve_grouping(
        request.grouping.as_deref(),
        request.trailing_months,
        "list",
    )?;

    let loaded = load_receipts(request.path, options.stdin_override, options.home_override)?;
    let mut query = SearchQuery::new(request.query.as_deref().unwrap_or_default());
    if request.search_snippets {
        query = query.with_snippet();
    }

    let classification = classify(&loaded.receipts, reference, &query, &grouping);
    if classification.skipped.count > 0 {
        tracing::warn!(
            skipped = classification.skipped.count,
            "receipts with unparseable dates were left out"
        );
    }

    let data = list_data(
        &classification,
        loaded.receipts.len(),
        request.hide_empty,
        source_info(loaded.source_kind, loaded.source_ref),
    );
    success("list", data)
}

fn list_data(
    classification: &Classification<'_>,
    receipts_read: usize,
    hide_empty: bool,
    source: SourceInfo,
) -> ReceiptListData {
    let sections = classification
        .sections
        .iter()
        .map(|section| SectionData {
            label: section.label().to_string(),
            start: section.bounds.start_iso(),
            end: section.bounds.end_iso(),
            count: section.receipts.len(),
            receipts: section
                .receipts
                .iter()
                .map(|receipt| ReceiptSummary::from(*receipt))
                .collect(),
        })
        .collect::<Vec<SectionData>>();

    let summary = ReceiptListSummary {
        receipts_read,
        matched: classification.matched_count(),
        sections: sections.len(),
        empty_sections: sections.iter().filter(|section| section.count == 0).count(),
    };

    ReceiptListData {
        grouping: classification.strategy.to_string(),
        reference_day: classification.reference.day().to_string(),
        query: classification.query.clone(),
        hide_empty,
        source,
        summary,
        sections,
        skipped: SkippedData {
            count: classification.skipped.count,
            ids: classification.skipped.ids.clone(),
            reason: SKIPPED_REASON.to_string(),
        },
    }
}

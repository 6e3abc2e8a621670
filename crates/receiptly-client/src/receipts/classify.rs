use chrono::NaiveDate;

use crate::receipts::date::parse_receipt_date;
use crate::receipts::partition::{PartitionStrategy, SectionBounds};
use crate::receipts::query::SearchQuery;
use crate::receipts::types::{DateSpan, Receipt, ReferenceDay};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub bounds: SectionBounds,
    pub receipts: Vec<&'a Receipt>,
}

impl Section<'_> {
    pub fn label(&self) -> &str {
        &self.bounds.label
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

/// Receipts that matched the query but were left out for an unparseable date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkippedRecords {
    pub count: usize,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub strategy: &'static str,
    pub reference: ReferenceDay,
    pub query: String,
    pub sections: Vec<Section<'a>>,
    pub skipped: SkippedRecords,
}

impl Classification<'_> {
    pub fn matched_count(&self) -> usize {
        self.sections.iter().map(|section| section.receipts.len()).sum()
    }

    pub fn section(&self, label: &str) -> Option<&Section<'_>> {
        self.sections.iter().find(|section| section.label() == label)
    }
}

/// Section bounds with member positions into the classified slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexedPass {
    pub(crate) sections: Vec<(SectionBounds, Vec<usize>)>,
    pub(crate) skipped: SkippedRecords,
}

/// Filters `receipts` by `query` and partitions the matches into the
/// strategy's sections.
///
/// Every section is returned, empty or not, in the strategy's order.
/// Members are sorted newest first; equal dates keep input order.
pub fn classify<'a, S>(
    receipts: &'a [Receipt],
    reference: ReferenceDay,
    query: &SearchQuery,
    strategy: &S,
) -> Classification<'a>
where
    S: PartitionStrategy + ?Sized,
{
    let pass = partition_indices(receipts, reference, query, strategy);
    let classification = materialize(receipts, reference, query, strategy.name(), &pass);

    tracing::debug!(
        strategy = classification.strategy,
        input = receipts.len(),
        matched = classification.matched_count(),
        skipped = classification.skipped.count,
        "classified receipts"
    );

    classification
}

pub(crate) fn partition_indices<S>(
    receipts: &[Receipt],
    reference: ReferenceDay,
    query: &SearchQuery,
    strategy: &S,
) -> IndexedPass
where
    S: PartitionStrategy + ?Sized,
{
    let parsed = receipts
        .iter()
        .map(|receipt| parse_receipt_date(&receipt.date))
        .collect::<Vec<Option<NaiveDate>>>();
    let span = DateSpan::from_dates(parsed.iter().flatten().copied());
    let bounds = strategy.sections(reference, span);

    let mut buckets: Vec<Vec<(NaiveDate, usize)>> = vec![Vec::new(); bounds.len()];
    let mut skipped = SkippedRecords::default();

    for (index, (receipt, date)) in receipts.iter().zip(parsed.iter()).enumerate() {
        if !query.matches(receipt) {
            continue;
        }
        let Some(date) = date else {
            tracing::debug!(
                receipt_id = %receipt.id,
                date = %receipt.date,
                "skipping receipt with unparseable date"
            );
            skipped.count += 1;
            skipped.ids.push(receipt.id.clone());
            continue;
        };
        match bounds.iter().position(|section| section.contains(*date)) {
            Some(section_index) => buckets[section_index].push((*date, index)),
            None => {
                tracing::warn!(
                    receipt_id = %receipt.id,
                    strategy = strategy.name(),
                    "partition strategy left a date uncovered"
                );
            }
        }
    }

    let sections = bounds
        .into_iter()
        .zip(buckets)
        .map(|(section_bounds, mut members)| {
            members.sort_by(|left, right| right.0.cmp(&left.0));
            let indices = members.into_iter().map(|(_, index)| index).collect();
            (section_bounds, indices)
        })
        .collect();

    IndexedPass { sections, skipped }
}

pub(crate) fn materialize<'a>(
    receipts: &'a [Receipt],
    reference: ReferenceDay,
    query: &SearchQuery,
    strategy: &'static str,
    pass: &IndexedPass,
) -> Classification<'a> {
    let sections = pass
        .sections
        .iter()
        .map(|(bounds, indices)| Section {
            bounds: bounds.clone(),
            receipts: indices
                .iter()
                .filter_map(|index| receipts.get(*index))
                .collect(),
        })
        .collect();

    Classification {
        strategy,
        reference,
        query: query.as_str().to_string(),
        sections,
        skipped: pass.skipped.clone(),
    }
}

/// First receipt carrying `id`. Duplicate ids resolve to the earliest record.
pub fn find_receipt<'a>(receipts: &'a [Receipt], id: &str) -> Option<&'a Receipt> {
    receipts.iter().find(|receipt| receipt.id == id)
}

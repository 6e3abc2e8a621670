use std::collections::HashMap;

use crate::receipts::classify::{Classification, IndexedPass, materialize, partition_indices};
use crate::receipts::partition::PartitionStrategy;
use crate::receipts::query::SearchQuery;
use crate::receipts::types::{Receipt, ReferenceDay};

/// A receipt list plus a version that moves on every mutation.
#[derive(Debug, Clone, Default)]
pub struct ReceiptCollection {
    receipts: Vec<Receipt>,
    version: u64,
}

impl ReceiptCollection {
    pub fn new(receipts: Vec<Receipt>) -> Self {
        Self {
            receipts,
            version: 0,
        }
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn replace(&mut self, receipts: Vec<Receipt>) {
        self.receipts = receipts;
        self.version += 1;
    }

    pub fn push(&mut self, receipt: Receipt) {
        self.receipts.push(receipt);
        self.version += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    reference: ReferenceDay,
    query: SearchQuery,
    strategy: String,
}

/// Memoised classification passes for one [`ReceiptCollection`].
///
/// Entries are keyed by reference day, query and strategy name, and are all
/// dropped as soon as the collection's version changes. Strategies sharing a
/// name must partition identically.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    version: Option<u64>,
    entries: HashMap<CacheKey, IndexedPass>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn classify<'a, S>(
        &mut self,
        collection: &'a ReceiptCollection,
        reference: ReferenceDay,
        query: &SearchQuery,
        strategy: &S,
    ) -> Classification<'a>
    where
        S: PartitionStrategy + ?Sized,
    {
        if self.version != Some(collection.version()) {
            if !self.entries.is_empty() {
                tracing::debug!(
                    dropped = self.entries.len(),
                    version = collection.version(),
                    "receipt collection changed; dropping cached passes"
                );
            }
            self.entries.clear();
            self.version = Some(collection.version());
        }

        let key = CacheKey {
            reference,
            query: query.clone(),
            strategy: strategy.cache_tag(),
        };
        let receipts = collection.receipts();

        if let Some(cached) = self.entries.get(&key) {
            return materialize(receipts, reference, query, strategy.name(), cached);
        }

        let pass = partition_indices(receipts, reference, query, strategy);
        let fresh = materialize(receipts, reference, query, strategy.name(), &pass);
        self.entries.insert(key, pass);
        fresh
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ClassificationCache, ReceiptCollection};
    use crate::receipts::classify::classify;
    use crate::receipts::partition::{CalendarMonths, RollingWindows};
    use crate::receipts::query::SearchQuery;
    use crate::receipts::types::{Receipt, ReferenceDay};

    fn reference(value: &str) -> ReferenceDay {
        ReferenceDay::new(NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN))
    }

    fn sample() -> ReceiptCollection {
        ReceiptCollection::new(vec![
            Receipt::new("1", "2024-10-18").with_sender("Uber", None),
            Receipt::new("2", "2024-10-10").with_sender("Uber Eats", None),
            Receipt::new("3", "broken").with_sender("Uber", None),
        ])
    }

    #[test]
    fn cache_hits_match_fresh_passes() {
        let collection = sample();
        let mut cache = ClassificationCache::new();
        let query = SearchQuery::new("uber");

        let first = cache.classify(&collection, reference("2024-10-18"), &query, &RollingWindows);
        let second = cache.classify(&collection, reference("2024-10-18"), &query, &RollingWindows);
        let fresh = classify(
            collection.receipts(),
            reference("2024-10-18"),
            &query,
            &RollingWindows,
        );

        assert_eq!(first, fresh);
        assert_eq!(second, fresh);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_days_queries_and_strategies_get_their_own_entries() {
        let collection = sample();
        let mut cache = ClassificationCache::new();
        let empty = SearchQuery::new("");
        let _ = cache.classify(&collection, reference("2024-10-18"), &empty, &RollingWindows);
        let _ = cache.classify(&collection, reference("2024-10-19"), &empty, &RollingWindows);
        let _ = cache.classify(
            &collection,
            reference("2024-10-18"),
            &SearchQuery::new("eats"),
            &RollingWindows,
        );
        let _ = cache.classify(
            &collection,
            reference("2024-10-18"),
            &empty,
            &CalendarMonths::default(),
        );
        let _ = cache.classify(
            &collection,
            reference("2024-10-18"),
            &empty,
            &CalendarMonths::trailing(1),
        );
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn collection_changes_invalidate_every_entry() {
        let mut collection = sample();
        let mut cache = ClassificationCache::new();
        let query = SearchQuery::new("");
        let before = cache
            .classify(&collection, reference("2024-10-18"), &query, &RollingWindows)
            .matched_count();
        assert_eq!(before, 2);

        collection.push(Receipt::new("4", "2024-10-17"));
        let after = cache
            .classify(&collection, reference("2024-10-18"), &query, &RollingWindows)
            .matched_count();
        assert_eq!(after, 3);
        assert_eq!(cache.len(), 1);
        assert_eq!(collection.version(), 1);
    }
}

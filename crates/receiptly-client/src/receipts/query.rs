use crate::receipts::types::Receipt;

/// Case-insensitive substring filter over a receipt's searchable text.
///
/// Sender name and date text are always searched. The snippet is searched
/// only when enabled with [`SearchQuery::with_snippet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchQuery {
    raw: String,
    needle: String,
    include_snippet: bool,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            needle: raw.to_lowercase(),
            include_snippet: false,
        }
    }

    pub fn with_snippet(mut self) -> Self {
        self.include_snippet = true;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, receipt: &Receipt) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        contains_folded(receipt.sender_name_or_empty(), &self.needle)
            || contains_folded(&receipt.date, &self.needle)
            || (self.include_snippet && contains_folded(receipt.snippet_or_empty(), &self.needle))
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::SearchQuery;
    use crate::receipts::types::Receipt;

    #[test]
    fn empty_query_matches_records_with_missing_fields() {
        let bare = Receipt::new("1", "");
        assert!(SearchQuery::new("").matches(&bare));
        assert!(!SearchQuery::new("amazon").matches(&bare));
    }

    #[test]
    fn matches_sender_and_date_case_insensitively() {
        let receipt = Receipt::new("1", "18 Oct 2024").with_sender("Amazon.ca", None);
        assert!(SearchQuery::new("AMAZON").matches(&receipt));
        assert!(SearchQuery::new("oct").matches(&receipt));
        assert!(!SearchQuery::new("uber").matches(&receipt));
    }

    #[test]
    fn snippet_is_searched_only_when_enabled() {
        let receipt = Receipt::new("1", "2024-10-18")
            .with_sender("Shop", None)
            .with_snippet("Your order of headphones");
        assert!(!SearchQuery::new("headphones").matches(&receipt));
        assert!(SearchQuery::new("Headphones").with_snippet().matches(&receipt));
    }
}

use chrono::NaiveDate;
use serde::Serialize;

/// Field names on the wire, including accepted aliases, are owned by the
/// source parser; serialisation writes the canonical snake_case names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub id: String,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub date: String,
    pub total: Option<String>,
    pub snippet: Option<String>,
    #[serde(rename = "receipt_link")]
    pub link: Option<String>,
    pub has_pdf: bool,
}

impl Receipt {
    pub fn new(id: &str, date: &str) -> Self {
        Self {
            id: id.to_string(),
            sender_name: None,
            sender_email: None,
            date: date.to_string(),
            total: None,
            snippet: None,
            link: None,
            has_pdf: false,
        }
    }

    pub fn with_sender(mut self, name: &str, email: Option<&str>) -> Self {
        self.sender_name = Some(name.to_string());
        self.sender_email = email.map(std::string::ToString::to_string);
        self
    }

    pub fn with_total(mut self, total: &str) -> Self {
        self.total = Some(total.to_string());
        self
    }

    pub fn with_snippet(mut self, snippet: &str) -> Self {
        self.snippet = Some(snippet.to_string());
        self
    }

    pub fn sender_name_or_empty(&self) -> &str {
        self.sender_name.as_deref().unwrap_or("")
    }

    pub fn snippet_or_empty(&self) -> &str {
        self.snippet.as_deref().unwrap_or("")
    }
}

/// The calendar day containing the classification's "now".
///
/// Captured once per pass so every bucket boundary is computed against the
/// same day even if the wall clock moves on mid-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceDay(NaiveDate);

impl ReferenceDay {
    pub const fn new(day: NaiveDate) -> Self {
        Self(day)
    }

    pub fn from_datetime<Tz: chrono::TimeZone>(now: &chrono::DateTime<Tz>) -> Self {
        Self(now.date_naive())
    }

    pub const fn day(self) -> NaiveDate {
        self.0
    }
}

/// Oldest and newest valid receipt dates in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DateSpan {
    pub fn from_dates<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut span: Option<Self> = None;
        for date in dates {
            span = Some(match span {
                Some(current) => Self {
                    earliest: current.earliest.min(date),
                    latest: current.latest.max(date),
                },
                None => Self {
                    earliest: date,
                    latest: date,
                },
            });
        }
        span
    }
}

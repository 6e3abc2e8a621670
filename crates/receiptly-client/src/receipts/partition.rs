use chrono::NaiveDate;

use crate::receipts::date::{
    first_of_month, format_iso_date, month_label, next_month_start, previous_month_start,
    shift_days,
};
use crate::receipts::types::{DateSpan, ReferenceDay};

pub const TODAY: &str = "Today";
pub const YESTERDAY: &str = "Yesterday";
pub const PREVIOUS_7_DAYS: &str = "Previous 7 Days";
pub const PREVIOUS_30_DAYS: &str = "Previous 30 Days";
pub const OLDER_THAN_30_DAYS: &str = "Older than 30 Days";
pub const EARLIER: &str = "Earlier";

const WEEK_WINDOW_DAYS: i64 = 7;
const MONTH_WINDOW_DAYS: i64 = 30;

/// A named half-open day range `[start, end)`. A `None` bound is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBounds {
    pub label: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl SectionBounds {
    fn new(label: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            label: label.to_string(),
            start,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let after_start = self.start.is_none_or(|start| date >= start);
        let before_end = self.end.is_none_or(|end| date < end);
        after_start && before_end
    }

    pub fn start_iso(&self) -> Option<String> {
        self.start.as_ref().map(format_iso_date)
    }

    pub fn end_iso(&self) -> Option<String> {
        self.end.as_ref().map(format_iso_date)
    }
}

/// Splits the calendar into ordered sections relative to a reference day.
///
/// Implementations must return disjoint ranges that together cover every
/// date, in the order sections are presented.
pub trait PartitionStrategy {
    fn name(&self) -> &'static str;

    /// `span` covers the valid dates of the whole collection, before any
    /// search filter, so the section list does not move while a query changes.
    fn sections(&self, reference: ReferenceDay, span: Option<DateSpan>) -> Vec<SectionBounds>;

    /// Distinguishes configurations that share a name when caching passes.
    fn cache_tag(&self) -> String {
        self.name().to_string()
    }
}

/// Today, Yesterday, Previous 7 Days, Previous 30 Days, Older than 30 Days.
///
/// Future-dated receipts land in Today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingWindows;

impl RollingWindows {
    pub const SECTION_LABELS: [&'static str; 5] = [
        TODAY,
        YESTERDAY,
        PREVIOUS_7_DAYS,
        PREVIOUS_30_DAYS,
        OLDER_THAN_30_DAYS,
    ];
}

impl PartitionStrategy for RollingWindows {
    fn name(&self) -> &'static str {
        "rolling"
    }

    fn sections(&self, reference: ReferenceDay, _span: Option<DateSpan>) -> Vec<SectionBounds> {
        let today = reference.day();
        let yesterday = shift_days(today, -1);
        let week_floor = shift_days(today, -WEEK_WINDOW_DAYS);
        let month_floor = shift_days(today, -MONTH_WINDOW_DAYS);

        vec![
            SectionBounds::new(TODAY, Some(today), None),
            SectionBounds::new(YESTERDAY, Some(yesterday), Some(today)),
            SectionBounds::new(PREVIOUS_7_DAYS, Some(week_floor), Some(yesterday)),
            SectionBounds::new(PREVIOUS_30_DAYS, Some(month_floor), Some(week_floor)),
            SectionBounds::new(OLDER_THAN_30_DAYS, None, Some(month_floor)),
        ]
    }
}

/// One section per calendar month, newest first.
///
/// With `trailing_months`, only that many months get their own section and
/// an `Earlier` section takes the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarMonths {
    pub trailing_months: Option<u32>,
}

impl CalendarMonths {
    pub fn trailing(months: u32) -> Self {
        Self {
            trailing_months: Some(months.max(1)),
        }
    }

    fn month_starts(reference: ReferenceDay, span: Option<DateSpan>) -> Vec<NaiveDate> {
        let reference_month = first_of_month(reference.day());
        let (newest, oldest) = match span {
            Some(value) => (
                reference_month.max(first_of_month(value.latest)),
                reference_month.min(first_of_month(value.earliest)),
            ),
            None => (reference_month, reference_month),
        };

        let mut months = vec![newest];
        let mut cursor = newest;
        while cursor > oldest {
            cursor = previous_month_start(cursor);
            months.push(cursor);
        }
        months
    }
}

impl PartitionStrategy for CalendarMonths {
    fn name(&self) -> &'static str {
        "monthly"
    }

    fn sections(&self, reference: ReferenceDay, span: Option<DateSpan>) -> Vec<SectionBounds> {
        let mut months = Self::month_starts(reference, span);
        let mut overflow = false;
        if let Some(limit) = self.trailing_months {
            let keep = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
            if months.len() > keep {
                months.truncate(keep);
                overflow = true;
            }
        }

        let last_index = months.len().saturating_sub(1);
        let mut sections = months
            .iter()
            .enumerate()
            .map(|(index, month)| {
                let start = if index == last_index && !overflow {
                    None
                } else {
                    Some(*month)
                };
                let end = if index == 0 {
                    None
                } else {
                    Some(next_month_start(*month))
                };
                SectionBounds::new(&month_label(*month), start, end)
            })
            .collect::<Vec<SectionBounds>>();

        if overflow && let Some(oldest_kept) = months.last() {
            sections.push(SectionBounds::new(EARLIER, None, Some(*oldest_kept)));
        }

        sections
    }

    fn cache_tag(&self) -> String {
        match self.trailing_months {
            Some(months) => format!("monthly:{months}"),
            None => "monthly".to_string(),
        }
    }
}

/// Runtime choice between the two strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Rolling(RollingWindows),
    Monthly(CalendarMonths),
}

impl Default for Grouping {
    fn default() -> Self {
        Self::Rolling(RollingWindows)
    }
}

impl Grouping {
    pub fn parse(value: &str, trailing_months: Option<u32>) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rolling" => Some(Self::Rolling(RollingWindows)),
            "monthly" | "month" => Some(Self::Monthly(CalendarMonths {
                trailing_months: trailing_months.map(|months| months.max(1)),
            })),
            _ => None,
        }
    }
}

impl PartitionStrategy for Grouping {
    fn name(&self) -> &'static str {
        match self {
            Self::Rolling(strategy) => strategy.name(),
            Self::Monthly(strategy) => strategy.name(),
        }
    }

    fn sections(&self, reference: ReferenceDay, span: Option<DateSpan>) -> Vec<SectionBounds> {
        match self {
            Self::Rolling(strategy) => strategy.sections(reference, span),
            Self::Monthly(strategy) => strategy.sections(reference, span),
        }
    }

    fn cache_tag(&self) -> String {
        match self {
            Self::Rolling(strategy) => strategy.cache_tag(),
            Self::Monthly(strategy) => strategy.cache_tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        CalendarMonths, EARLIER, Grouping, PartitionStrategy, RollingWindows, SectionBounds,
    };
    use crate::receipts::date::shift_days;
    use crate::receipts::types::{DateSpan, ReferenceDay};

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    fn owners(sections: &[SectionBounds], date: NaiveDate) -> Vec<String> {
        sections
            .iter()
            .filter(|section| section.contains(date))
            .map(|section| section.label.clone())
            .collect()
    }

    #[test]
    fn rolling_windows_cover_every_day_exactly_once() {
        let reference = ReferenceDay::new(day("2024-10-18"));
        let sections = RollingWindows.sections(reference, None);
        let labels = sections
            .iter()
            .map(|section| section.label.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(labels, RollingWindows::SECTION_LABELS);

        for offset in -400..=5 {
            let date = shift_days(reference.day(), offset);
            assert_eq!(owners(&sections, date).len(), 1, "offset {offset}");
        }
    }

    #[test]
    fn rolling_window_edges_are_half_open() {
        let reference = ReferenceDay::new(day("2024-10-18"));
        let sections = RollingWindows.sections(reference, None);
        let expectations = [
            ("2024-10-19", "Today"),
            ("2024-10-18", "Today"),
            ("2024-10-17", "Yesterday"),
            ("2024-10-16", "Previous 7 Days"),
            ("2024-10-11", "Previous 7 Days"),
            ("2024-10-10", "Previous 30 Days"),
            ("2024-09-18", "Previous 30 Days"),
            ("2024-09-17", "Older than 30 Days"),
        ];
        for (date, label) in expectations {
            assert_eq!(owners(&sections, day(date)), vec![label.to_string()], "{date}");
        }
    }

    #[test]
    fn calendar_months_fill_gaps_newest_first() {
        let reference = ReferenceDay::new(day("2024-10-18"));
        let span = DateSpan {
            earliest: day("2024-07-30"),
            latest: day("2024-10-02"),
        };
        let sections = CalendarMonths::default().sections(reference, Some(span));
        let labels = sections
            .iter()
            .map(|section| section.label.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(
            labels,
            vec!["October 2024", "September 2024", "August 2024", "July 2024"]
        );
        assert_eq!(sections[0].start_iso().as_deref(), Some("2024-10-01"));
        assert!(sections[0].end.is_none());
        assert!(sections[3].start.is_none());

        for offset in -500..=500 {
            let date = shift_days(reference.day(), offset);
            assert_eq!(owners(&sections, date).len(), 1, "offset {offset}");
        }
    }

    #[test]
    fn calendar_months_extend_forward_for_future_receipts() {
        let reference = ReferenceDay::new(day("2024-12-31"));
        let span = DateSpan {
            earliest: day("2025-01-04"),
            latest: day("2025-01-04"),
        };
        let sections = CalendarMonths::default().sections(reference, Some(span));
        let labels = sections
            .iter()
            .map(|section| section.label.clone())
            .collect::<Vec<String>>();
        assert_eq!(labels, vec!["January 2025", "December 2024"]);
    }

    #[test]
    fn trailing_months_fold_older_receipts_into_earlier() {
        let reference = ReferenceDay::new(day("2024-10-18"));
        let span = DateSpan {
            earliest: day("2023-01-01"),
            latest: day("2024-10-18"),
        };
        let sections = CalendarMonths::trailing(2).sections(reference, Some(span));
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].label, EARLIER);
        assert_eq!(sections[2].end_iso().as_deref(), Some("2024-09-01"));
        assert_eq!(owners(&sections, day("2024-08-31")), vec![EARLIER.to_string()]);
        assert_eq!(
            owners(&sections, day("2024-09-01")),
            vec!["September 2024".to_string()]
        );
    }

    #[test]
    fn grouping_parses_strategy_names() {
        assert_eq!(
            Grouping::parse("rolling", None),
            Some(Grouping::Rolling(RollingWindows))
        );
        assert_eq!(
            Grouping::parse("Monthly", Some(0)),
            Some(Grouping::Monthly(CalendarMonths::trailing(1)))
        );
        assert!(Grouping::parse("weekly", None).is_none());
        assert_eq!(Grouping::default().name(), "rolling");
    }
}

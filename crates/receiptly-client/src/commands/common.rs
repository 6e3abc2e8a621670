use chrono::NaiveDate;

use crate::contracts::types::SourceInfo;
use crate::receipts::date::looks_like_iso_date;
use crate::receipts::{Grouping, ReferenceDay};
use crate::{ClientError, ClientResult};

/// Resolves `--today`, falling back to the local calendar day.
pub(crate) fn resolve_reference_day(
    value: Option<&str>,
    command: &str,
) -> ClientResult<ReferenceDay> {
    match value {
        Some(text) => Ok(ReferenceDay::new(parse_iso_date_strict(text, "today", command)?)),
        None => Ok(ReferenceDay::from_datetime(&chrono::Local::now())),
    }
}

pub(crate) fn resolve_grouping(
    value: Option<&str>,
    trailing_months: Option<u32>,
    command: &str,
) -> ClientResult<Grouping> {
    let Some(name) = value else {
        return match trailing_months {
            Some(_) => Err(ClientError::invalid_argument_for_command(
                "`months` only applies to monthly grouping. Add `--group monthly`.",
                Some(command),
            )),
            None => Ok(Grouping::default()),
        };
    };

    let grouping = Grouping::parse(name, trailing_months).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            &format!("Unknown grouping `{name}`. Use `rolling` or `monthly`."),
            Some(command),
        )
    })?;
    if matches!(grouping, Grouping::Rolling(_)) && trailing_months.is_some() {
        return Err(ClientError::invalid_argument_for_command(
            "`months` only applies to monthly grouping. Add `--group monthly`.",
            Some(command),
        ));
    }
    Ok(grouping)
}

pub(crate) fn source_info(kind: &str, reference: Option<String>) -> SourceInfo {
    SourceInfo {
        kind: kind.to_string(),
        reference,
    }
}

fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> ClientResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve_grouping, resolve_reference_day};
    use crate::receipts::{CalendarMonths, Grouping};

    #[test]
    fn reference_day_rejects_non_iso_and_impossible_dates() {
        assert!(resolve_reference_day(Some("18 Oct 2024"), "list").is_err());
        assert!(resolve_reference_day(Some("2024-02-30"), "list").is_err());
        let parsed = resolve_reference_day(Some("2024-10-18"), "list");
        assert!(parsed.is_ok());
        if let Ok(day) = parsed {
            assert_eq!(day.day().to_string(), "2024-10-18");
        }
    }

    #[test]
    fn months_require_monthly_grouping() {
        assert!(resolve_grouping(None, Some(3), "list").is_err());
        assert!(resolve_grouping(Some("rolling"), Some(3), "list").is_err());
        let grouping = resolve_grouping(Some("monthly"), Some(3), "list");
        assert!(grouping.is_ok());
        if let Ok(value) = grouping {
            assert_eq!(value, Grouping::Monthly(CalendarMonths::trailing(3)));
        }
    }
}

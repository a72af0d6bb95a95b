//! Best-effort date parsing.
//!
//! Accepted layouts, tried in order: ISO date, ISO datetime (with `T` or a
//! space), `YYYY/MM/DD`, month-first `MM/DD/YYYY`, then day-first
//! `DD/MM/YYYY` for values that cannot be month-first (e.g. `25/04/2025`).

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;
use types::{DataError, DatePolicy};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse one cell. Returns `None` for empty or unrecognized values.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a whole column under a [`DatePolicy`].
///
/// Lenient: failures become `None` and are counted in the second tuple
/// element. Strict: the first failure is returned as [`DataError::DateParse`].
/// Empty cells are failures too.
pub fn parse_dates(
    cells: &[&str],
    policy: DatePolicy,
) -> Result<(Vec<Option<NaiveDate>>, usize), DataError> {
    let mut failures = 0;
    let mut dates = Vec::with_capacity(cells.len());

    for (row, cell) in cells.iter().enumerate() {
        match parse_date(cell) {
            Some(date) => dates.push(Some(date)),
            None if policy == DatePolicy::Strict => {
                return Err(DataError::DateParse {
                    row,
                    value: cell.to_string(),
                });
            }
            None => {
                failures += 1;
                dates.push(None);
            }
        }
    }

    if failures > 0 {
        warn!(
            failures,
            total = cells.len(),
            "Unparseable dates set to null"
        );
    }

    Ok((dates, failures))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(parse_date("2024-03-05"), ymd(2024, 3, 5));
        assert_eq!(parse_date(" 2024-03-05 "), ymd(2024, 3, 5));
        assert_eq!(parse_date("2024-03-05 13:45:00"), ymd(2024, 3, 5));
        assert_eq!(parse_date("2024-03-05T13:45:00"), ymd(2024, 3, 5));
        assert_eq!(parse_date("2024/03/05"), ymd(2024, 3, 5));
    }

    #[test]
    fn test_month_first_then_day_first() {
        assert_eq!(parse_date("03/05/2024"), ymd(2024, 3, 5));
        assert_eq!(parse_date("25/04/2025"), ymd(2025, 4, 25));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn test_lenient_counts_failures() {
        let (dates, failures) =
            parse_dates(&["2024-01-01", "oops", ""], DatePolicy::Lenient).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), None, None]);
        assert_eq!(failures, 2);
    }

    #[test]
    fn test_strict_reports_first_failure() {
        let err = parse_dates(&["2024-01-01", "oops", "bad"], DatePolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            DataError::DateParse {
                row: 1,
                value: "oops".into()
            }
        );
    }
}

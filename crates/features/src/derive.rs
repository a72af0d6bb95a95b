//! Calendar and rolling features.

use stats::trailing_means;
use tracing::{debug, warn};
use types::{CalendarFeatures, FeatureRow, FeatureTable, ROLLING_WINDOW, SalesTable};

/// Derive model features from an enriched table.
///
/// Rows with a null date are dropped (and counted), the rest are stably
/// sorted by date, and `rolling_mean_7d` is the mean of sales over each row
/// and up to 6 preceding rows in that order. The input is not modified.
pub fn derive(table: &SalesTable) -> FeatureTable {
    let mut dated: Vec<_> = table
        .records
        .iter()
        .filter_map(|record| record.date.map(|date| (date, record)))
        .collect();

    let dropped_null_dates = table.len() - dated.len();
    if dropped_null_dates > 0 {
        warn!(dropped = dropped_null_dates, "Rows with null dates excluded from features");
    }

    // Stable: same-date rows keep their input order.
    dated.sort_by_key(|(date, _)| *date);

    let sales: Vec<f64> = dated.iter().map(|(_, r)| r.sales as f64).collect();
    let rolling = trailing_means(&sales, ROLLING_WINDOW);

    let rows: Vec<FeatureRow> = dated
        .into_iter()
        .zip(rolling)
        .map(|((date, record), rolling_mean_7d)| FeatureRow {
            record: record.clone(),
            date,
            calendar: CalendarFeatures::from_date(date),
            rolling_mean_7d,
        })
        .collect();

    debug!(rows = rows.len(), "Features derived");

    FeatureTable {
        extra_columns: table.extra_columns.clone(),
        rows,
        dropped_null_dates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use types::SalesRecord;

    fn record(date: Option<NaiveDate>, sales: i64) -> SalesRecord {
        SalesRecord {
            date,
            sales,
            stock: None,
            price: None,
            promotion: false,
            holiday: false,
            extra: Vec::new(),
        }
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, d)
    }

    fn table(records: Vec<SalesRecord>) -> SalesTable {
        SalesTable {
            extra_columns: Vec::new(),
            records,
            unparsed_dates: 0,
        }
    }

    #[test]
    fn test_rolling_mean_over_seven_rows() {
        let sales = [10, 20, 10, 20, 10, 20, 10];
        let input = table(
            sales
                .iter()
                .enumerate()
                .map(|(i, s)| record(day(i as u32 + 1), *s))
                .collect(),
        );
        let out = derive(&input);

        assert_eq!(out.rows[0].rolling_mean_7d, 10.0);
        assert_eq!(out.rows[1].rolling_mean_7d, 15.0);
        assert!((out.rows[6].rolling_mean_7d - 100.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_by_date_regardless_of_input_order() {
        let ordered = table(vec![record(day(1), 5), record(day(2), 7), record(day(3), 9)]);
        let shuffled = table(vec![record(day(3), 9), record(day(1), 5), record(day(2), 7)]);

        let a = derive(&ordered);
        let b = derive(&shuffled);
        assert_eq!(a, b);
        assert_eq!(a.rows[2].rolling_mean_7d, 7.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = table(vec![record(day(2), 1), record(day(1), 2), record(day(2), 3)]);
        let out = derive(&input);
        let sales: Vec<i64> = out.rows.iter().map(|r| r.record.sales).collect();
        assert_eq!(sales, vec![2, 1, 3]);
    }

    #[test]
    fn test_null_dates_dropped() {
        let input = table(vec![record(day(1), 4), record(None, 100), record(day(2), 6)]);
        let out = derive(&input);
        assert_eq!(out.len(), 2);
        assert_eq!(out.dropped_null_dates, 1);
        assert_eq!(out.rows[1].rolling_mean_7d, 5.0);
    }

    #[test]
    fn test_input_untouched_and_calendar_filled() {
        let input = table(vec![record(day(6), 3)]);
        let before = input.clone();
        let out = derive(&input);
        assert_eq!(input, before);

        // 2024-01-06 is a Saturday
        let cal = out.rows[0].calendar;
        assert_eq!(cal.day_of_week, 5);
        assert!(cal.is_weekend);
        assert_eq!(cal.month, 1);
        assert_eq!(cal.year, 2024);
    }

    #[test]
    fn test_empty_table() {
        let out = derive(&SalesTable::default());
        assert!(out.is_empty());
        assert_eq!(out.dropped_null_dates, 0);
    }
}

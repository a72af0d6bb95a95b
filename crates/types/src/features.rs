//! Unified feature schema for training and prediction.
//!
//! The model input vector is defined once, here. The training run builds its
//! design matrix through [`FeatureRow::model_input`] and the prediction run
//! builds its inputs through the same function, so the column set and order
//! cannot diverge between the two.
//!
//! # Design Philosophy
//!
//! - **Declarative**: feature names and positions are constants
//! - **Pure Functions**: calendar features depend on the date alone
//! - **Type-Safe Indices**: named positions instead of magic numbers

use chrono::{Datelike, NaiveDate, Weekday};

use crate::record::SalesRecord;

// =============================================================================
// Constants
// =============================================================================

/// Trailing window (current row plus up to 6 preceding rows) for the rolling mean.
pub const ROLLING_WINDOW: usize = 7;

/// Name of the rolling-mean column. Derived, but not a model input.
pub const ROLLING_MEAN_7D: &str = "rolling_mean_7d";

/// Number of model input features.
pub const N_MODEL_FEATURES: usize = 9;

/// Model input feature names, in input-vector order.
pub const FEATURE_NAMES: &[&str] = &[
    "day_of_week",
    "week_of_year",
    "month",
    "year",
    "is_weekend",
    "is_month_start",
    "is_month_end",
    "promotion",
    "feriado",
];

/// Named positions in the model input vector.
pub mod idx {
    pub const DAY_OF_WEEK: usize = 0;
    pub const WEEK_OF_YEAR: usize = 1;
    pub const MONTH: usize = 2;
    pub const YEAR: usize = 3;
    pub const IS_WEEKEND: usize = 4;
    pub const IS_MONTH_START: usize = 5;
    pub const IS_MONTH_END: usize = 6;
    pub const PROMOTION: usize = 7;
    pub const HOLIDAY: usize = 8;
}

/// Derived column names in output order (calendar features, then rolling mean).
pub const DERIVED_COLUMNS: &[&str] = &[
    "day_of_week",
    "week_of_year",
    "month",
    "year",
    "is_weekend",
    "is_month_start",
    "is_month_end",
    ROLLING_MEAN_7D,
];

// =============================================================================
// Calendar Features
// =============================================================================

/// Temporal features that depend only on the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    /// ISO 8601 week number.
    pub week_of_year: u32,
    pub month: u32,
    pub year: i32,
    pub is_weekend: bool,
    pub is_month_start: bool,
    pub is_month_end: bool,
}

impl CalendarFeatures {
    /// Compute all calendar features for a date.
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            day_of_week,
            week_of_year: date.iso_week().week(),
            month: date.month(),
            year: date.year(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_month_start: date.day() == 1,
            is_month_end: date
                .succ_opt()
                .map_or(true, |next| next.month() != date.month()),
        }
    }
}

// =============================================================================
// Feature Rows
// =============================================================================

/// An enriched record with its derived features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub record: SalesRecord,
    /// Date the calendar features were computed from.
    pub date: NaiveDate,
    pub calendar: CalendarFeatures,
    /// Trailing mean of sales over the current and up to 6 preceding rows.
    pub rolling_mean_7d: f64,
}

impl FeatureRow {
    /// Model input vector in [`FEATURE_NAMES`] order. Flags are encoded as 0/1.
    pub fn model_input(&self) -> [f64; N_MODEL_FEATURES] {
        let mut x = [0.0; N_MODEL_FEATURES];
        x[idx::DAY_OF_WEEK] = self.calendar.day_of_week as f64;
        x[idx::WEEK_OF_YEAR] = self.calendar.week_of_year as f64;
        x[idx::MONTH] = self.calendar.month as f64;
        x[idx::YEAR] = self.calendar.year as f64;
        x[idx::IS_WEEKEND] = flag(self.calendar.is_weekend);
        x[idx::IS_MONTH_START] = flag(self.calendar.is_month_start);
        x[idx::IS_MONTH_END] = flag(self.calendar.is_month_end);
        x[idx::PROMOTION] = flag(self.record.promotion);
        x[idx::HOLIDAY] = flag(self.record.holiday);
        x
    }
}

#[inline]
fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Feature-derived dataset, sorted by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    /// Passthrough column names, aligned with each record's `extra`.
    pub extra_columns: Vec<String>,
    /// Rows in ascending date order (ties keep input order).
    pub rows: Vec<FeatureRow>,
    /// Input rows excluded because their date was null.
    pub dropped_null_dates: usize,
}

impl FeatureTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Model inputs, one vector per row.
    pub fn design_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.model_input().to_vec()).collect()
    }

    /// Target column (`sales`) as floats.
    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.record.sales as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(date: NaiveDate, promotion: bool, holiday: bool) -> FeatureRow {
        FeatureRow {
            record: SalesRecord {
                date: Some(date),
                sales: 10,
                stock: None,
                price: None,
                promotion,
                holiday,
                extra: vec![],
            },
            date,
            calendar: CalendarFeatures::from_date(date),
            rolling_mean_7d: 10.0,
        }
    }

    #[test]
    fn test_feature_name_count_matches_constant() {
        assert_eq!(FEATURE_NAMES.len(), N_MODEL_FEATURES);
        assert_eq!(FEATURE_NAMES[idx::PROMOTION], "promotion");
        assert_eq!(FEATURE_NAMES[idx::HOLIDAY], "feriado");
    }

    #[test]
    fn test_monday_is_zero() {
        // 2024-01-01 was a Monday.
        let f = CalendarFeatures::from_date(date(2024, 1, 1));
        assert_eq!(f.day_of_week, 0);
        assert!(!f.is_weekend);
        assert!(f.is_month_start);
        assert!(!f.is_month_end);
        assert_eq!(f.week_of_year, 1);
    }

    #[test]
    fn test_weekend_and_month_end() {
        // 2024-03-31 was a Sunday.
        let f = CalendarFeatures::from_date(date(2024, 3, 31));
        assert_eq!(f.day_of_week, 6);
        assert!(f.is_weekend);
        assert!(f.is_month_end);
        assert_eq!(f.month, 3);
        assert_eq!(f.year, 2024);
    }

    #[test]
    fn test_leap_day_month_end() {
        assert!(CalendarFeatures::from_date(date(2024, 2, 29)).is_month_end);
        assert!(!CalendarFeatures::from_date(date(2024, 2, 28)).is_month_end);
        assert!(CalendarFeatures::from_date(date(2023, 2, 28)).is_month_end);
    }

    #[test]
    fn test_iso_week_crosses_year() {
        // 2021-01-01 belongs to ISO week 53 of 2020.
        assert_eq!(CalendarFeatures::from_date(date(2021, 1, 1)).week_of_year, 53);
        // 2024-12-30 belongs to ISO week 1 of 2025.
        assert_eq!(CalendarFeatures::from_date(date(2024, 12, 30)).week_of_year, 1);
    }

    #[test]
    fn test_model_input_order() {
        let x = row(date(2024, 12, 25), true, true).model_input();
        assert_eq!(x[idx::DAY_OF_WEEK], 2.0); // Wednesday
        assert_eq!(x[idx::WEEK_OF_YEAR], 52.0);
        assert_eq!(x[idx::MONTH], 12.0);
        assert_eq!(x[idx::YEAR], 2024.0);
        assert_eq!(x[idx::IS_WEEKEND], 0.0);
        assert_eq!(x[idx::IS_MONTH_START], 0.0);
        assert_eq!(x[idx::IS_MONTH_END], 0.0);
        assert_eq!(x[idx::PROMOTION], 1.0);
        assert_eq!(x[idx::HOLIDAY], 1.0);
    }

    #[test]
    fn test_design_matrix_shape() {
        let table = FeatureTable {
            extra_columns: vec![],
            rows: vec![row(date(2024, 1, 1), false, true), row(date(2024, 1, 2), false, false)],
            dropped_null_dates: 0,
        };
        let x = table.design_matrix();
        assert_eq!(x.len(), 2);
        assert!(x.iter().all(|r| r.len() == N_MODEL_FEATURES));
        assert_eq!(table.targets(), vec![10.0, 10.0]);
    }
}

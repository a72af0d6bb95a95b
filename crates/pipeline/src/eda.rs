//! Exploratory summary of an enriched dataset.
//!
//! Numbers only; charts are left to downstream tooling reading the CSV or
//! Parquet export.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use stats::{Describe, quantile};
use tracing::info;
use types::{FeatureRow, FeatureTable};

/// Lower quartile, median and upper quartile of a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    fn from_values(mut values: Vec<f64>) -> Option<Self> {
        values.sort_by(f64::total_cmp);
        Some(Self {
            count: values.len(),
            q1: quantile(&values, 0.25)?,
            median: quantile(&values, 0.5)?,
            q3: quantile(&values, 0.75)?,
        })
    }
}

/// Date with the highest total sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub total_sales: i64,
}

/// Summary of a feature table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdaSummary {
    pub rows: usize,
    pub dropped_null_dates: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub unique_dates: usize,
    pub sales: Option<Describe>,
    pub promotion_days: usize,
    pub holiday_days: usize,
    pub sales_with_promotion: i64,
    pub sales_without_promotion: i64,
    pub holiday_sales: Option<Quartiles>,
    pub regular_day_sales: Option<Quartiles>,
    pub peak_day: Option<PeakDay>,
}

impl EdaSummary {
    pub fn from_table(table: &FeatureTable) -> Self {
        let sales: Vec<f64> = table.targets();

        let mut daily: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in &table.rows {
            let total = daily.entry(row.date).or_default();
            *total = total.saturating_add(row.record.sales);
        }
        // First date wins ties.
        let peak_day = daily
            .iter()
            .fold(None::<PeakDay>, |best, (&date, &total_sales)| match best {
                Some(b) if b.total_sales >= total_sales => Some(b),
                _ => Some(PeakDay { date, total_sales }),
            });

        let (promo, regular): (Vec<_>, Vec<_>) =
            table.rows.iter().partition(|r| r.record.promotion);
        let (holiday, normal): (Vec<_>, Vec<_>) =
            table.rows.iter().partition(|r| r.record.holiday);

        Self {
            rows: table.len(),
            dropped_null_dates: table.dropped_null_dates,
            first_date: daily.keys().next().copied(),
            last_date: daily.keys().next_back().copied(),
            unique_dates: daily.len(),
            sales: Describe::from_values(&sales),
            promotion_days: promo.len(),
            holiday_days: holiday.len(),
            sales_with_promotion: total_sales(&promo),
            sales_without_promotion: total_sales(&regular),
            holiday_sales: Quartiles::from_values(
                holiday.iter().map(|r| r.record.sales as f64).collect(),
            ),
            regular_day_sales: Quartiles::from_values(
                normal.iter().map(|r| r.record.sales as f64).collect(),
            ),
            peak_day,
        }
    }

    /// Emit the headline numbers as one structured event.
    pub fn log(&self) {
        info!(
            rows = self.rows,
            unique_dates = self.unique_dates,
            first_date = ?self.first_date,
            last_date = ?self.last_date,
            mean_sales = ?self.sales.as_ref().map(|d| d.mean),
            promotion_days = self.promotion_days,
            holiday_days = self.holiday_days,
            sales_with_promotion = self.sales_with_promotion,
            sales_without_promotion = self.sales_without_promotion,
            holiday_median = ?self.holiday_sales.map(|q| q.median),
            regular_median = ?self.regular_day_sales.map(|q| q.median),
            "EDA summary"
        );
    }
}

/// Sales total that clamps at `i64::MAX` instead of overflowing.
fn total_sales(rows: &[&FeatureRow]) -> i64 {
    rows.iter()
        .fold(0i64, |total, r| total.saturating_add(r.record.sales))
}

//! Typed sales records.

use chrono::NaiveDate;

/// One observation for one date, after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Parsed date; `None` when the source cell was unparseable.
    pub date: Option<NaiveDate>,
    /// Units sold, after coercion and promotion uplift.
    pub sales: i64,
    /// Stock on hand (passthrough).
    pub stock: Option<f64>,
    /// Unit price (passthrough).
    pub price: Option<f64>,
    /// Promotion running on this date.
    pub promotion: bool,
    /// Date is a national holiday.
    pub holiday: bool,
    /// Unknown source columns, aligned with [`SalesTable::extra_columns`].
    pub extra: Vec<String>,
}

/// Enriched dataset: typed records plus passthrough column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    /// Names of passthrough columns carried in [`SalesRecord::extra`].
    pub extra_columns: Vec<String>,
    /// Records in input order.
    pub records: Vec<SalesRecord>,
    /// Number of date cells that could not be parsed.
    pub unparsed_dates: usize,
}

impl SalesTable {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sales column as a vector.
    pub fn sales(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.sales).collect()
    }

    /// Promotion column as a vector.
    pub fn promotions(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.promotion).collect()
    }
}

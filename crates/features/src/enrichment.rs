//! Enrichment stage: raw export -> typed, holiday/promotion-tagged sales table.
//!
//! Each step is a free function so it can be tested on its own; [`Enricher`]
//! runs them in the fixed order. Coercion must precede the uplift, and the
//! uplift must run exactly once.

use calendar::HolidayCalendar;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use types::schema::{self, PRICE, PROMOTION, REQUIRED_COLUMNS, SALES, SOURCE_RENAMES, STOCK};
use types::{DataError, DatePolicy, RawTable, SalesRecord, SalesTable};

use crate::dates::parse_dates;

/// Share of rows flagged as promotion days when the column is synthesized.
pub const DEFAULT_PROMOTION_PROBABILITY: f64 = 0.15;

/// Sales multiplier on promotion days.
pub const DEFAULT_UPLIFT_FACTOR: f64 = 1.4;

/// Tunables for the enrichment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichmentConfig {
    /// Bernoulli probability for synthesized promotion flags.
    pub promotion_probability: f64,
    /// Multiplier applied to sales on promotion days (result truncated).
    pub uplift_factor: f64,
    /// Handling of unparseable dates.
    pub date_policy: DatePolicy,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            promotion_probability: DEFAULT_PROMOTION_PROBABILITY,
            uplift_factor: DEFAULT_UPLIFT_FACTOR,
            date_policy: DatePolicy::Lenient,
        }
    }
}

// =============================================================================
// Steps
// =============================================================================

/// Step 1: map source-language headers to canonical names.
pub fn rename_columns(raw: &mut RawTable) {
    debug!(columns = ?raw.headers(), "Source columns");
    raw.rename_columns(SOURCE_RENAMES);
    debug!(columns = ?raw.headers(), "Canonical columns");
}

/// Step 3: holiday flag per row. Null dates are never holidays.
pub fn tag_holidays<C: HolidayCalendar>(dates: &[Option<NaiveDate>], calendar: &C) -> Vec<bool> {
    dates
        .iter()
        .map(|d| d.is_some_and(|date| calendar.is_holiday(date)))
        .collect()
}

/// Step 4: i.i.d. Bernoulli(`probability`) promotion flags drawn from `rng`.
pub fn synthesize_promotions<R: Rng + ?Sized>(n: usize, probability: f64, rng: &mut R) -> Vec<bool> {
    let p = probability.clamp(0.0, 1.0);
    (0..n).map(|_| rng.gen_bool(p)).collect()
}

/// Parse a 0/1-style flag. Unrecognized values are `false`.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
        return true;
    }
    value.parse::<f64>().is_ok_and(|v| v != 0.0 && v.is_finite())
}

/// Step 5: coerce a sales cell to an integer.
///
/// Non-numeric, missing, non-finite and negative values become 0; fractional
/// values are truncated.
pub fn coerce_sales(value: &str) -> i64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc() as i64,
        _ => 0,
    }
}

/// Step 6: multiply sales by `factor` on promotion rows, truncating.
pub fn apply_uplift(sales: &mut [i64], promotions: &[bool], factor: f64) {
    for (value, _) in sales.iter_mut().zip(promotions).filter(|(_, promo)| **promo) {
        *value = (*value as f64 * factor) as i64;
    }
}

fn parse_optional_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Enricher
// =============================================================================

/// Runs the enrichment steps in order against an injected holiday calendar.
#[derive(Debug, Clone)]
pub struct Enricher<C> {
    calendar: C,
    config: EnrichmentConfig,
}

impl<C: HolidayCalendar> Enricher<C> {
    pub fn new(calendar: C, config: EnrichmentConfig) -> Self {
        Self { calendar, config }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Enrich a raw table with a fresh generator seeded from `seed`.
    ///
    /// Identical input and seed always give identical output.
    pub fn enrich(&self, raw: RawTable, seed: u64) -> Result<SalesTable, DataError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.enrich_with_rng(raw, &mut rng)
    }

    /// Enrich a raw table, drawing synthesized promotions from `rng`.
    ///
    /// # Errors
    /// - [`DataError::Schema`] when `date` or `sales` is missing after renaming
    /// - [`DataError::DateParse`] under [`DatePolicy::Strict`]
    pub fn enrich_with_rng<R: Rng + ?Sized>(
        &self,
        mut raw: RawTable,
        rng: &mut R,
    ) -> Result<SalesTable, DataError> {
        // 1. Rename
        rename_columns(&mut raw);
        raw.require(REQUIRED_COLUMNS)?;

        // 2. Dates
        let date_cells = raw.required_column(schema::DATE)?;
        let (dates, unparsed_dates) = parse_dates(&date_cells, self.config.date_policy)?;

        // 3. Holidays
        let holidays = tag_holidays(&dates, &self.calendar);

        // 4. Promotions
        let promotions = match raw.column(PROMOTION) {
            Some(cells) => cells.iter().map(|c| parse_flag(c)).collect(),
            None => {
                let promotions =
                    synthesize_promotions(raw.len(), self.config.promotion_probability, rng);
                info!(
                    rows = raw.len(),
                    promoted = promotions.iter().filter(|p| **p).count(),
                    "Synthesized promotion flags"
                );
                promotions
            }
        };

        // 5. Sales coercion
        let mut sales: Vec<i64> = raw
            .required_column(SALES)?
            .iter()
            .map(|c| coerce_sales(c))
            .collect();

        // 6. Uplift
        apply_uplift(&mut sales, &promotions, self.config.uplift_factor);

        let table = self.assemble(&raw, dates, holidays, promotions, sales, unparsed_dates);
        info!(
            rows = table.len(),
            holidays = table.records.iter().filter(|r| r.holiday).count(),
            calendar = self.calendar.name(),
            "Enrichment complete"
        );
        Ok(table)
    }

    fn assemble(
        &self,
        raw: &RawTable,
        dates: Vec<Option<NaiveDate>>,
        holidays: Vec<bool>,
        promotions: Vec<bool>,
        sales: Vec<i64>,
        unparsed_dates: usize,
    ) -> SalesTable {
        let stock_idx = raw.column_index(STOCK);
        let price_idx = raw.column_index(PRICE);
        let extra: Vec<(usize, String)> = raw
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, name)| !schema::is_reserved(name))
            .map(|(i, name)| (i, name.clone()))
            .collect();

        let records = raw
            .rows()
            .iter()
            .zip(dates)
            .zip(holidays)
            .zip(promotions)
            .zip(sales)
            .map(|((((row, date), holiday), promotion), sales)| SalesRecord {
                date,
                sales,
                stock: stock_idx.and_then(|i| parse_optional_number(&row[i])),
                price: price_idx.and_then(|i| parse_optional_number(&row[i])),
                promotion,
                holiday,
                extra: extra.iter().map(|(i, _)| row[*i].clone()).collect(),
            })
            .collect();

        SalesTable {
            extra_columns: extra.into_iter().map(|(_, name)| name).collect(),
            records,
            unparsed_dates,
        }
    }
}

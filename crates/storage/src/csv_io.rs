//! CSV load and export.
//!
//! Input files are read as untyped [`RawTable`]s (headers kept verbatim,
//! cells trimmed, ragged rows tolerated). Output files carry the enriched
//! and derived columns in a fixed order:
//!
//! ```text
//! date, sales, stock, price, <passthrough...>, feriado, promotion,
//! day_of_week, week_of_year, month, year, is_weekend, is_month_start,
//! is_month_end, rolling_mean_7d[, sales_predicted]
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};
use types::schema::{DATE, HOLIDAY, PRICE, PROMOTION, SALES, SALES_PREDICTED, STOCK};
use types::{DERIVED_COLUMNS, FeatureRow, FeatureTable, RawTable};

use crate::error::{Result, StorageError, ensure_parent_dir};

// =============================================================================
// Reading
// =============================================================================

/// Read a CSV file with a header row.
pub fn read_raw_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(StorageError::io(path))?;
    let table = read_raw(file)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded dataset"
    );
    Ok(table)
}

/// Read CSV from any reader. The first record is the header row.
pub fn read_raw<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(headers, rows))
}

// =============================================================================
// Writing
// =============================================================================

/// Output header row for a table, with or without the prediction column.
pub fn output_headers(table: &FeatureTable, with_predictions: bool) -> Vec<String> {
    let mut headers: Vec<String> = [DATE, SALES, STOCK, PRICE]
        .iter()
        .map(|s| s.to_string())
        .collect();
    headers.extend(table.extra_columns.iter().cloned());
    headers.push(HOLIDAY.to_string());
    headers.push(PROMOTION.to_string());
    headers.extend(DERIVED_COLUMNS.iter().map(|s| s.to_string()));
    if with_predictions {
        headers.push(SALES_PREDICTED.to_string());
    }
    headers
}

/// Write a feature table (and optional predictions) to a CSV file,
/// creating parent directories as needed.
pub fn write_feature_csv<P: AsRef<Path>>(
    path: P,
    table: &FeatureTable,
    predictions: Option<&[f64]>,
) -> Result<usize> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(StorageError::io(path))?;
    let rows = write_features(file, table, predictions)?;
    info!(path = %path.display(), rows, "Wrote feature CSV");
    Ok(rows)
}

/// Write a feature table to any writer. Returns the number of data rows.
///
/// When `predictions` is given it must have one value per row; missing
/// trailing values are written as empty cells.
pub fn write_features<W: Write>(
    writer: W,
    table: &FeatureTable,
    predictions: Option<&[f64]>,
) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(output_headers(table, predictions.is_some()))?;

    for (i, row) in table.rows.iter().enumerate() {
        let mut record = row_cells(row);
        if let Some(predicted) = predictions {
            record.push(predicted.get(i).map(f64::to_string).unwrap_or_default());
        }
        out.write_record(&record)?;
    }

    out.flush().map_err(|e| StorageError::Csv(e.into()))?;
    debug!(rows = table.len(), "Feature rows serialized");
    Ok(table.len())
}

fn row_cells(row: &FeatureRow) -> Vec<String> {
    let record = &row.record;
    let cal = &row.calendar;

    let mut cells = vec![
        row.date.to_string(),
        record.sales.to_string(),
        optional(record.stock),
        optional(record.price),
    ];
    cells.extend(record.extra.iter().cloned());
    cells.extend([
        flag(record.holiday),
        flag(record.promotion),
        cal.day_of_week.to_string(),
        cal.week_of_year.to_string(),
        cal.month.to_string(),
        cal.year.to_string(),
        flag(cal.is_weekend),
        flag(cal.is_month_start),
        flag(cal.is_month_end),
        row.rolling_mean_7d.to_string(),
    ]);
    cells
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

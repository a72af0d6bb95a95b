//! Buffered Parquet writer for enriched feature tables.
//!
//! Writes the same columns as the CSV export with typed Arrow columns:
//! `date` as Date32, counts as Int64/Int32, flags as Boolean, passthrough
//! columns as Utf8, and floats as nullable Float64.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Date32Builder, Float64Builder, Int32Builder, Int64Builder,
    StringBuilder, UInt32Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::info;
use types::schema::{DATE, HOLIDAY, PRICE, PROMOTION, SALES, SALES_PREDICTED, STOCK};
use types::{FeatureRow, FeatureTable, ROLLING_MEAN_7D};

use crate::error::{Result, StorageError, ensure_parent_dir};

/// Buffer size before flushing to Parquet (number of rows).
const BUFFER_SIZE: usize = 10_000;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Buffered Parquet writer for feature rows.
pub struct FeatureParquetWriter {
    /// Arrow schema.
    schema: Arc<Schema>,
    /// Number of passthrough columns.
    n_extra: usize,
    /// Whether a `sales_predicted` column is written.
    with_predictions: bool,
    /// Buffered rows and their predictions.
    buffer: Vec<(FeatureRow, Option<f64>)>,
    /// Arrow writer.
    writer: Option<ArrowWriter<File>>,
    /// Total rows flushed.
    rows_written: usize,
}

impl FeatureParquetWriter {
    /// Create a writer at `path`, creating parent directories as needed.
    pub fn new<P: AsRef<Path>>(
        path: P,
        extra_columns: &[String],
        with_predictions: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let schema = Arc::new(Self::build_schema(extra_columns, with_predictions));

        ensure_parent_dir(path)?;
        let file = File::create(path).map_err(StorageError::io(path))?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        Ok(Self {
            schema,
            n_extra: extra_columns.len(),
            with_predictions,
            buffer: Vec::with_capacity(BUFFER_SIZE),
            writer: Some(writer),
            rows_written: 0,
        })
    }

    /// Build the Arrow schema for feature rows.
    fn build_schema(extra_columns: &[String], with_predictions: bool) -> Schema {
        let mut fields = vec![
            Field::new(DATE, DataType::Date32, false),
            Field::new(SALES, DataType::Int64, false),
            Field::new(STOCK, DataType::Float64, true),
            Field::new(PRICE, DataType::Float64, true),
        ];

        // Passthrough columns
        for name in extra_columns {
            fields.push(Field::new(name, DataType::Utf8, true));
        }

        // Enrichment flags
        fields.push(Field::new(HOLIDAY, DataType::Boolean, false));
        fields.push(Field::new(PROMOTION, DataType::Boolean, false));

        // Calendar features
        fields.push(Field::new("day_of_week", DataType::UInt32, false));
        fields.push(Field::new("week_of_year", DataType::UInt32, false));
        fields.push(Field::new("month", DataType::UInt32, false));
        fields.push(Field::new("year", DataType::Int32, false));
        fields.push(Field::new("is_weekend", DataType::Boolean, false));
        fields.push(Field::new("is_month_start", DataType::Boolean, false));
        fields.push(Field::new("is_month_end", DataType::Boolean, false));
        fields.push(Field::new(ROLLING_MEAN_7D, DataType::Float64, false));

        if with_predictions {
            fields.push(Field::new(SALES_PREDICTED, DataType::Float64, true));
        }

        Schema::new(fields)
    }

    /// Buffer one row. Automatically flushes when the buffer is full.
    pub fn write_row(&mut self, row: &FeatureRow, predicted: Option<f64>) -> Result<()> {
        self.buffer.push((row.clone(), predicted));
        if self.buffer.len() >= BUFFER_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    /// Buffer a whole table, pairing rows with `predictions` by position.
    pub fn write_table(&mut self, table: &FeatureTable, predictions: Option<&[f64]>) -> Result<()> {
        for (i, row) in table.rows.iter().enumerate() {
            let predicted = predictions.and_then(|p| p.get(i).copied());
            self.write_row(row, predicted)?;
        }
        Ok(())
    }

    /// Flush buffered rows to the Parquet file.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = self.build_record_batch()?;
        if let Some(ref mut writer) = self.writer {
            writer.write(&batch)?;
        }

        self.rows_written += self.buffer.len();
        self.buffer.clear();
        Ok(())
    }

    /// Build an Arrow RecordBatch from buffered rows.
    fn build_record_batch(&self) -> Result<RecordBatch> {
        let num_rows = self.buffer.len();

        let mut date_builder = Date32Builder::with_capacity(num_rows);
        let mut sales_builder = Int64Builder::with_capacity(num_rows);
        let mut stock_builder = Float64Builder::with_capacity(num_rows);
        let mut price_builder = Float64Builder::with_capacity(num_rows);
        let mut extra_builders: Vec<StringBuilder> = (0..self.n_extra)
            .map(|_| StringBuilder::with_capacity(num_rows, num_rows * 8))
            .collect();

        let mut holiday_builder = BooleanBuilder::with_capacity(num_rows);
        let mut promotion_builder = BooleanBuilder::with_capacity(num_rows);

        let mut dow_builder = UInt32Builder::with_capacity(num_rows);
        let mut week_builder = UInt32Builder::with_capacity(num_rows);
        let mut month_builder = UInt32Builder::with_capacity(num_rows);
        let mut year_builder = Int32Builder::with_capacity(num_rows);
        let mut weekend_builder = BooleanBuilder::with_capacity(num_rows);
        let mut month_start_builder = BooleanBuilder::with_capacity(num_rows);
        let mut month_end_builder = BooleanBuilder::with_capacity(num_rows);
        let mut rolling_builder = Float64Builder::with_capacity(num_rows);
        let mut predicted_builder = Float64Builder::with_capacity(num_rows);

        for (row, predicted) in &self.buffer {
            let record = &row.record;
            let cal = &row.calendar;

            date_builder.append_value(row.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE);
            sales_builder.append_value(record.sales);
            stock_builder.append_option(record.stock);
            price_builder.append_option(record.price);
            for (i, builder) in extra_builders.iter_mut().enumerate() {
                builder.append_option(record.extra.get(i));
            }

            holiday_builder.append_value(record.holiday);
            promotion_builder.append_value(record.promotion);

            dow_builder.append_value(cal.day_of_week);
            week_builder.append_value(cal.week_of_year);
            month_builder.append_value(cal.month);
            year_builder.append_value(cal.year);
            weekend_builder.append_value(cal.is_weekend);
            month_start_builder.append_value(cal.is_month_start);
            month_end_builder.append_value(cal.is_month_end);
            rolling_builder.append_value(row.rolling_mean_7d);
            predicted_builder.append_option(*predicted);
        }

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(date_builder.finish()),
            Arc::new(sales_builder.finish()),
            Arc::new(stock_builder.finish()),
            Arc::new(price_builder.finish()),
        ];
        for builder in extra_builders.iter_mut() {
            columns.push(Arc::new(builder.finish()));
        }
        columns.push(Arc::new(holiday_builder.finish()));
        columns.push(Arc::new(promotion_builder.finish()));
        columns.push(Arc::new(dow_builder.finish()));
        columns.push(Arc::new(week_builder.finish()));
        columns.push(Arc::new(month_builder.finish()));
        columns.push(Arc::new(year_builder.finish()));
        columns.push(Arc::new(weekend_builder.finish()));
        columns.push(Arc::new(month_start_builder.finish()));
        columns.push(Arc::new(month_end_builder.finish()));
        columns.push(Arc::new(rolling_builder.finish()));
        if self.with_predictions {
            columns.push(Arc::new(predicted_builder.finish()));
        }

        Ok(RecordBatch::try_new(self.schema.clone(), columns)?)
    }

    /// Finish writing and close the file. Returns the number of rows written.
    ///
    /// Must be called to ensure all data is written.
    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }
        Ok(self.rows_written)
    }

    /// Rows written so far, including buffered ones.
    pub fn rows_written(&self) -> usize {
        self.rows_written + self.buffer.len()
    }
}

/// Write a whole feature table to `path` in one call.
pub fn write_feature_parquet<P: AsRef<Path>>(
    path: P,
    table: &FeatureTable,
    predictions: Option<&[f64]>,
) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = FeatureParquetWriter::new(path, &table.extra_columns, predictions.is_some())?;
    writer.write_table(table, predictions)?;
    let rows = writer.finish()?;
    info!(path = %path.display(), rows, "Wrote feature parquet");
    Ok(rows)
}

//! Enrichment and feature derivation.
//!
//! This crate turns a raw sales export into model-ready rows. The same two
//! calls are made by the training run and by the prediction run:
//!
//! ```text
//! RawTable ──Enricher::enrich(seed)──► SalesTable ──derive()──► FeatureTable
//! ```
//!
//! # Enrichment steps (fixed order)
//!
//! 1. Rename source-language columns to canonical names
//! 2. Parse dates (lenient: nulls + warning, strict: error)
//! 3. Tag holidays through a [`calendar::HolidayCalendar`]
//! 4. Synthesize promotions (seeded Bernoulli) when the column is absent
//! 5. Coerce sales to non-negative integers
//! 6. Apply the promotion uplift to sales
//!
//! # Example
//!
//! ```ignore
//! use calendar::BrazilCalendar;
//! use features::{Enricher, EnrichmentConfig, derive};
//!
//! let enricher = Enricher::new(BrazilCalendar::new(), EnrichmentConfig::default());
//! let enriched = enricher.enrich(raw, 42)?;
//! let table = derive(&enriched);
//! ```

pub mod dates;
pub mod derive;
pub mod enrichment;

pub use dates::{parse_date, parse_dates};
pub use derive::derive;
pub use enrichment::{
    DEFAULT_PROMOTION_PROBABILITY, DEFAULT_UPLIFT_FACTOR, Enricher, EnrichmentConfig,
    apply_uplift, coerce_sales, parse_flag, rename_columns, synthesize_promotions, tag_holidays,
};

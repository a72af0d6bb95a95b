//! Column naming and parsing policy.
//!
//! Source exports use Portuguese headers. Everything downstream works on the
//! canonical English names below.

use serde::{Deserialize, Serialize};

/// Canonical date column.
pub const DATE: &str = "date";
/// Canonical sales (target) column.
pub const SALES: &str = "sales";
/// Canonical stock column (passed through, unused by modeling).
pub const STOCK: &str = "stock";
/// Canonical price column (passed through, unused by modeling).
pub const PRICE: &str = "price";
/// Promotion flag column.
pub const PROMOTION: &str = "promotion";
/// Holiday flag column.
pub const HOLIDAY: &str = "feriado";
/// Prediction column appended by the prediction run.
pub const SALES_PREDICTED: &str = "sales_predicted";

/// Source-language header -> canonical header.
pub const SOURCE_RENAMES: &[(&str, &str)] = &[
    ("data", DATE),
    ("venda", SALES),
    ("estoque", STOCK),
    ("preco", PRICE),
];

/// Columns that must exist after renaming.
pub const REQUIRED_COLUMNS: &[&str] = &[DATE, SALES];

/// Whether `name` is produced by the pipeline itself.
///
/// Input columns with these names are not carried through as passthrough
/// columns, so re-feeding an exported file does not duplicate them.
pub fn is_reserved(name: &str) -> bool {
    [DATE, SALES, STOCK, PRICE, PROMOTION, HOLIDAY, SALES_PREDICTED].contains(&name)
        || crate::features::FEATURE_NAMES.contains(&name)
        || name == crate::features::ROLLING_MEAN_7D
}

/// How unparseable date cells are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Unparseable dates become null and are reported as a data-quality warning.
    #[default]
    Lenient,
    /// The first unparseable date aborts enrichment.
    Strict,
}

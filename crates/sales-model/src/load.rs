//! Validation of raw rows into the typed [`Dataset`].
//!
//! Structural problems (a required column missing from the header) fail the whole load. Row
//! level problems exclude the row and are counted in the [`LoadReport`]; nothing is zeroed or
//! invented to keep a row alive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{normalize_date, DateOrder, DateParseOptions};
use crate::{Dataset, DateSystem, OrderRecord, RawTable, RawValue};

/// Header name for each order field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnMapping {
    pub region: String,
    pub subregion: String,
    pub product_name: String,
    pub sales: String,
    pub profit: String,
    pub order_date: String,
    /// Optional column: when absent from the header every ship date is left empty.
    pub ship_date: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            region: "Region".to_string(),
            subregion: "State".to_string(),
            product_name: "Product Name".to_string(),
            sales: "Sales".to_string(),
            profit: "Profit".to_string(),
            order_date: "Order Date".to_string(),
            ship_date: "Ship Date".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadOptions {
    pub columns: ColumnMapping,
    pub date_system: DateSystem,
    pub date_order: DateOrder,
    /// Decimal separator used when numeric columns arrive as text.
    pub decimal_separator: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            date_system: DateSystem::default(),
            date_order: DateOrder::default(),
            decimal_separator: '.',
        }
    }
}

impl LoadOptions {
    fn date_options(&self) -> DateParseOptions {
        DateParseOptions {
            system: self.date_system,
            order: self.date_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("input table has no header row")]
    EmptyTable,
    #[error("required column {column:?} is missing from the input")]
    MissingField { column: String },
}

/// What happened to each input row during a load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows excluded because the order date could not be resolved.
    pub unparseable_dates: usize,
    /// Rows excluded because region, subregion or product name was empty.
    pub missing_keys: usize,
    /// Rows excluded because sales or profit was not a finite number (or sales was negative).
    pub invalid_numbers: usize,
    /// Loaded rows whose ship date was present but could not be resolved.
    pub cleared_ship_dates: usize,
}

impl LoadReport {
    pub fn excluded_rows(&self) -> usize {
        self.unparseable_dates + self.missing_keys + self.invalid_numbers
    }
}

#[derive(Clone, Copy, Debug)]
struct ColumnIndices {
    region: usize,
    subregion: usize,
    product_name: usize,
    sales: usize,
    profit: usize,
    order_date: usize,
    ship_date: Option<usize>,
}

impl ColumnIndices {
    fn resolve(table: &RawTable, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let required = |name: &str| {
            table.column_idx(name).ok_or_else(|| LoadError::MissingField {
                column: name.to_string(),
            })
        };

        Ok(Self {
            region: required(&mapping.region)?,
            subregion: required(&mapping.subregion)?,
            product_name: required(&mapping.product_name)?,
            sales: required(&mapping.sales)?,
            profit: required(&mapping.profit)?,
            order_date: required(&mapping.order_date)?,
            ship_date: table.column_idx(&mapping.ship_date),
        })
    }
}

enum RowIssue {
    MissingKey,
    InvalidNumber,
    UnparseableDate,
}

/// Validate every row of `table` into an [`OrderRecord`].
///
/// Fails only when the header is empty or a required column is absent from it.
pub fn load_dataset(
    table: &RawTable,
    options: &LoadOptions,
) -> Result<(Dataset, LoadReport), LoadError> {
    if table.columns().is_empty() {
        return Err(LoadError::EmptyTable);
    }
    let columns = ColumnIndices::resolve(table, &options.columns)?;

    let mut report = LoadReport {
        total_rows: table.row_count(),
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(table.row_count());

    for row in table.rows() {
        match load_row(row, columns, options, &mut report) {
            Ok(record) => records.push(record),
            Err(RowIssue::MissingKey) => report.missing_keys += 1,
            Err(RowIssue::InvalidNumber) => report.invalid_numbers += 1,
            Err(RowIssue::UnparseableDate) => report.unparseable_dates += 1,
        }
    }
    report.loaded_rows = records.len();

    if report.excluded_rows() > 0 {
        log::warn!(
            "excluded {} of {} order rows ({} unparseable order dates, {} missing keys, {} invalid numbers)",
            report.excluded_rows(),
            report.total_rows,
            report.unparseable_dates,
            report.missing_keys,
            report.invalid_numbers,
        );
    }
    if report.cleared_ship_dates > 0 {
        log::debug!("cleared {} unparseable ship dates", report.cleared_ship_dates);
    }

    Ok((Dataset::new(records), report))
}

fn load_row(
    row: &[RawValue],
    columns: ColumnIndices,
    options: &LoadOptions,
    report: &mut LoadReport,
) -> Result<OrderRecord, RowIssue> {
    let cell = |idx: usize| row.get(idx).unwrap_or(&RawValue::Empty);
    let key = |idx: usize| {
        cell(idx)
            .as_text()
            .map(|s| s.into_owned())
            .ok_or(RowIssue::MissingKey)
    };

    let region = key(columns.region)?;
    let subregion = key(columns.subregion)?;
    let product_name = key(columns.product_name)?;

    let sales = cell(columns.sales)
        .as_number(options.decimal_separator)
        .filter(|v| *v >= 0.0)
        .ok_or(RowIssue::InvalidNumber)?;
    let profit = cell(columns.profit)
        .as_number(options.decimal_separator)
        .ok_or(RowIssue::InvalidNumber)?;

    let order_date = normalize_date(cell(columns.order_date), options.date_options())
        .map_err(|_| RowIssue::UnparseableDate)?;

    let ship_date = match columns.ship_date.map(cell) {
        None => None,
        Some(raw) if raw.is_empty() => None,
        Some(raw) => match normalize_date(raw, options.date_options()) {
            Ok(date) => Some(date),
            Err(_) => {
                report.cleared_ship_dates += 1;
                None
            }
        },
    };

    Ok(OrderRecord {
        region,
        subregion,
        product_name,
        sales,
        profit,
        order_date,
        ship_date,
    })
}

//! `sales-model` defines the in-memory sales-orders dataset and everything needed to build it.
//!
//! The crate covers the load side of the dashboard pipeline:
//! - spreadsheet serial dates (1900 and 1904 systems) and the date normalizer
//! - a raw, column-mapped table as produced by ingestion
//! - validation of raw rows into an immutable [`Dataset`] with a [`LoadReport`]
//! - CSV import into the raw table shape
//! - the static subregion -> coordinate [`GeoTable`]

#![forbid(unsafe_code)]

mod date_system;
pub mod dates;
pub mod geo;
pub mod import;
pub mod load;
mod record;
mod table;
mod value;

pub use date_system::DateSystem;
pub use dates::{normalize_date, DateError, DateOrder, DateParseOptions};
pub use geo::{GeoCoordinate, GeoTable, GeoTableError};
pub use import::{import_csv, load_csv, CsvOptions, CsvTextEncoding, ImportError};
pub use load::{load_dataset, ColumnMapping, LoadError, LoadOptions, LoadReport};
pub use record::{Dataset, OrderRecord};
pub use table::{RawTable, TableError};
pub use value::RawValue;

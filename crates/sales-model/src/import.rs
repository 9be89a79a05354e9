//! CSV ingestion into a [`RawTable`].
//!
//! Every non-blank field is kept as text; typing happens in [`crate::load`], where the column
//! mapping says which fields are dates and which are numbers.

use std::borrow::Cow;
use std::io::BufRead;
use std::str::Utf8Error;

use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use thiserror::Error;

use crate::{
    load_dataset, Dataset, LoadError, LoadOptions, LoadReport, RawTable, RawValue, TableError,
};

#[derive(Clone, Debug)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// How to decode raw CSV bytes into text fields.
    pub encoding: CsvTextEncoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: CsvTextEncoding::Auto,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsvTextEncoding {
    /// Attempt to decode as UTF-8; if a field contains invalid UTF-8, fall back to Windows-1252.
    ///
    /// Spreadsheet exports on Windows commonly produce Windows-1252 text.
    Auto,
    /// Decode as UTF-8 and reject invalid byte sequences.
    Utf8,
    /// Decode as Windows-1252 (aka CP-1252).
    Windows1252,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("csv input was empty")]
    EmptyInput,
    #[error("csv parse error at row {row}, column {column}: {reason}")]
    Parse { row: u64, column: u64, reason: String },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read a headered CSV stream into a [`RawTable`].
///
/// Rows may have varying field counts: short rows are padded with empty cells, and fields
/// beyond the header get synthesized `ColumnN` headers.
pub fn import_csv<R: BufRead>(reader: R, options: &CsvOptions) -> Result<RawTable, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Headers are handled manually so row/column locations stay consistent in errors.
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    let mut record_index: u64 = 0;

    let has_header = csv_reader
        .read_byte_record(&mut record)
        .map_err(|e| map_csv_error(e, record_index + 1))?;
    if !has_header {
        return Err(ImportError::EmptyInput);
    }
    record_index += 1;

    let mut header: Vec<String> = decode_record(&record, record_index, options.encoding)?
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<RawValue>> = Vec::new();
    loop {
        record.clear();
        match csv_reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                record_index += 1;
                let fields = decode_record(&record, record_index, options.encoding)?;
                if fields.iter().all(|f| f.trim().is_empty()) {
                    continue;
                }
                rows.push(fields.into_iter().map(raw_cell).collect());
            }
            Err(e) => return Err(map_csv_error(e, record_index + 1)),
        }
    }

    let column_count = rows.iter().map(Vec::len).fold(header.len(), usize::max);
    if header.len() < column_count {
        header.extend((header.len()..column_count).map(|i| format!("Column{}", i + 1)));
    }

    let mut table = RawTable::new(header);
    for mut row in rows {
        row.resize(column_count, RawValue::Empty);
        table.push_row(row)?;
    }

    log::debug!(
        "imported {} csv rows across {} columns",
        table.row_count(),
        column_count
    );
    Ok(table)
}

/// Import a CSV stream and validate it into a [`Dataset`] in one step.
pub fn load_csv<R: BufRead>(
    reader: R,
    csv: &CsvOptions,
    load: &LoadOptions,
) -> Result<(Dataset, LoadReport), ImportError> {
    let table = import_csv(reader, csv)?;
    Ok(load_dataset(&table, load)?)
}

fn raw_cell(field: String) -> RawValue {
    if field.trim().is_empty() {
        RawValue::Empty
    } else {
        RawValue::Text(field)
    }
}

/// Decode one record. `row` is 1-based and counts the header as row 1, the same numbering
/// [`csv_error_row`] uses for reader errors.
fn decode_record(
    record: &ByteRecord,
    row: u64,
    encoding: CsvTextEncoding,
) -> Result<Vec<String>, ImportError> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            // Spreadsheet "CSV UTF-8" exports start with a byte-order mark.
            let field = match (row, idx) {
                (1, 0) => field.strip_prefix(UTF8_BOM).unwrap_or(field),
                _ => field,
            };
            decode_text(field, encoding)
                .map(Cow::into_owned)
                .map_err(|e| ImportError::Parse {
                    row,
                    column: idx as u64 + 1,
                    reason: format!("invalid UTF-8: {e}"),
                })
        })
        .collect()
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn decode_text(bytes: &[u8], encoding: CsvTextEncoding) -> Result<Cow<'_, str>, Utf8Error> {
    let strict = match encoding {
        CsvTextEncoding::Windows1252 => return Ok(WINDOWS_1252.decode(bytes).0),
        CsvTextEncoding::Utf8 => true,
        CsvTextEncoding::Auto => false,
    };
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(e) if strict => Err(e),
        Err(_) => Ok(WINDOWS_1252.decode(bytes).0),
    }
}

fn map_csv_error(err: csv::Error, fallback_row: u64) -> ImportError {
    let reason = err.to_string();
    let row = csv_error_row(err.position(), fallback_row);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => ImportError::Io(e),
        _ => ImportError::Parse {
            row,
            column: 0,
            reason,
        },
    }
}

/// 1-based row of a reader error. `csv` counts records from 0 and, with headers read as a plain
/// record, the header is its record 0.
fn csv_error_row(position: Option<&csv::Position>, fallback_row: u64) -> u64 {
    position.map_or(fallback_row, |p| p.record() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_errors_use_the_same_row_numbers_as_decoding() {
        let mut header = csv::Position::new();
        header.set_record(0);
        assert_eq!(csv_error_row(Some(&header), 99), 1);

        let mut third = csv::Position::new();
        third.set_record(2);
        assert_eq!(csv_error_row(Some(&third), 99), 3);

        assert_eq!(csv_error_row(None, 7), 7);
    }

    #[test]
    fn strict_utf8_reports_the_one_based_cell() {
        let mut record = ByteRecord::new();
        record.push_field(b"Texas");
        record.push_field(b"Caf\xe9");
        let err = decode_record(&record, 3, CsvTextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, ImportError::Parse { row: 3, column: 2, .. }));
    }

    #[test]
    fn bom_is_stripped_from_the_first_header_cell_only() {
        let mut record = ByteRecord::new();
        record.push_field(b"\xEF\xBB\xBFRegion");
        assert_eq!(
            decode_record(&record, 1, CsvTextEncoding::Auto).unwrap(),
            vec!["Region".to_string()]
        );
        assert_eq!(
            decode_record(&record, 2, CsvTextEncoding::Auto).unwrap(),
            vec!["\u{FEFF}Region".to_string()]
        );
    }
}

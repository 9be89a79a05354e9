use std::collections::HashMap;

use thiserror::Error;

use crate::RawValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row has {actual} values but the table has {expected} columns")]
    ColumnCount { expected: usize, actual: usize },
}

/// Header names plus rows of raw cells: the shape ingestion hands to the loader.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<impl Into<String>>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            // First occurrence wins for duplicated headers.
            column_index.entry(name.clone()).or_insert(idx);
        }

        Self {
            columns,
            column_index,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_idx(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<RawValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::ColumnCount {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }
}

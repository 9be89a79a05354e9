use chrono::NaiveDate;
use sales_model::{ColumnMapping, DateOrder, DateSystem, LoadOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::DEFAULT_LINE_BREAK;
use crate::DateWindow;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid dashboard config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topN must be at least 1")]
    ZeroTopN,
    #[error("labelWidth must be at least 1")]
    ZeroLabelWidth,
    #[error("fallback window starts after it ends ({start} > {end})")]
    InvalidFallbackWindow { start: NaiveDate, end: NaiveDate },
}

/// Dashboard settings.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Length of each ranking.
    pub top_n: usize,
    /// Maximum characters per line of a ranking label.
    pub label_width: usize,
    pub line_break: String,
    /// Date bounds used when the filters leave no rows to take bounds from.
    pub fallback_window: DateWindow,
    pub date_system: DateSystem,
    pub date_order: DateOrder,
    pub columns: ColumnMapping,
    /// Decimal separator for numeric columns that arrive as text.
    pub decimal_separator: char,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            label_width: 20,
            line_break: DEFAULT_LINE_BREAK.to_string(),
            fallback_window: DateWindow {
                start: ymd(2015, 1, 1),
                end: ymd(2020, 12, 31),
            },
            date_system: DateSystem::default(),
            date_order: DateOrder::default(),
            columns: ColumnMapping::default(),
            decimal_separator: '.',
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        if self.label_width == 0 {
            return Err(ConfigError::ZeroLabelWidth);
        }
        let DateWindow { start, end } = self.fallback_window;
        if start > end {
            return Err(ConfigError::InvalidFallbackWindow { start, end });
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: self.columns.clone(),
            date_system: self.date_system,
            date_order: self.date_order,
            decimal_separator: self.decimal_separator,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Non-fatal conditions surfaced alongside an otherwise successful result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// The selected region does not occur in the dataset. It is kept, so the result is empty.
    StaleRegion { requested: String },
    /// The selected subregion is not part of the selected region and was reset to "all".
    StaleSubregion { requested: String },
    /// The requested start date was after the end date; the end was clamped to the start.
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// Subregions with no coordinate entry; they are left off the map but still counted.
    GeoLookupMiss { keys: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::StaleRegion { requested } => {
                write!(f, "region {requested:?} does not occur in the data; no rows match")
            }
            Warning::StaleSubregion { requested } => {
                write!(f, "subregion {requested:?} is not in the selected region; showing all")
            }
            Warning::InvalidDateRange { start, end } => {
                write!(f, "start date {start} is after end date {end}; end clamped to start")
            }
            Warning::GeoLookupMiss { keys } => {
                write!(f, "no coordinates for: {}", keys.join(", "))
            }
        }
    }
}

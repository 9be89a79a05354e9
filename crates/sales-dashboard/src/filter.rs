//! Cascading filter resolution: region, then subregion, then date window.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use sales_model::{Dataset, OrderRecord};
use serde::{Deserialize, Serialize};

use crate::warning::Warning;

/// One selector value: either every option or a single named one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn only(value: impl Into<String>) -> Self {
        Choice::Only(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(value) => value == candidate,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(value) => f.write_str(value),
        }
    }
}

/// Inclusive calendar date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The user's current control values.
///
/// Unset dates default to the bounds of the rows left after the region and subregion filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSelection {
    pub region: Choice,
    pub subregion: Choice,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Choice::only(region);
        self
    }

    pub fn with_subregion(mut self, subregion: impl Into<String>) -> Self {
        self.subregion = Choice::only(subregion);
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }
}

/// The outcome of applying a [`FilterSelection`] to a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterResolution<'a> {
    /// Rows passing every filter, in dataset order.
    pub rows: Vec<&'a OrderRecord>,
    /// `All` followed by every region in first-seen order.
    pub region_options: Vec<Choice>,
    /// `All` followed by every subregion of the selected region in first-seen order.
    pub subregion_options: Vec<Choice>,
    /// The selection actually applied: stale subregion reset, dates filled in and ordered.
    pub selection: FilterSelection,
    /// Order-date bounds of the region/subregion-filtered rows, or the fallback window when
    /// there are none.
    pub available: DateWindow,
    pub warnings: Vec<Warning>,
}

impl FilterResolution<'_> {
    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.selection.start_date.unwrap_or(self.available.start),
            end: self.selection.end_date.unwrap_or(self.available.end),
        }
    }
}

/// Apply `selection` to `dataset`.
///
/// Never fails: empty intermediate results flow through as empty row sets, with the date
/// bounds falling back to `fallback`. A region missing from the data is kept and reported with
/// [`Warning::StaleRegion`]; a subregion missing from the selected region resets to all.
pub fn resolve(
    dataset: &Dataset,
    selection: FilterSelection,
    fallback: DateWindow,
) -> FilterResolution<'_> {
    let mut warnings = Vec::new();

    let region_options = options_in_order(dataset.iter().map(|r| r.region.as_str()));
    if !region_options.contains(&selection.region) {
        warnings.push(Warning::StaleRegion {
            requested: selection.region.to_string(),
        });
    }
    let region_filtered: Vec<&OrderRecord> = dataset
        .iter()
        .filter(|r| selection.region.matches(&r.region))
        .collect();

    let subregion_options =
        options_in_order(region_filtered.iter().map(|r| r.subregion.as_str()));
    let subregion = match selection.subregion {
        Choice::Only(requested)
            if !subregion_options
                .iter()
                .any(|option| option.value() == Some(requested.as_str())) =>
        {
            warnings.push(Warning::StaleSubregion { requested });
            Choice::All
        }
        other => other,
    };

    let subregion_filtered: Vec<&OrderRecord> = region_filtered
        .into_iter()
        .filter(|r| subregion.matches(&r.subregion))
        .collect();

    let available = date_bounds(&subregion_filtered).unwrap_or(fallback);
    let start = selection.start_date.unwrap_or(available.start);
    let mut end = selection.end_date.unwrap_or(available.end);
    if start > end {
        warnings.push(Warning::InvalidDateRange { start, end });
        end = start;
    }
    let window = DateWindow { start, end };

    let rows: Vec<&OrderRecord> = subregion_filtered
        .into_iter()
        .filter(|r| window.contains(r.order_date))
        .collect();

    for warning in &warnings {
        log::debug!("filter: {warning}");
    }

    FilterResolution {
        rows,
        region_options,
        subregion_options,
        selection: FilterSelection {
            region: selection.region,
            subregion,
            start_date: Some(start),
            end_date: Some(end),
        },
        available,
        warnings,
    }
}

fn options_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Choice> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut options = vec![Choice::All];
    for value in values {
        if seen.insert(value) {
            options.push(Choice::only(value));
        }
    }
    options
}

fn date_bounds(rows: &[&OrderRecord]) -> Option<DateWindow> {
    let start = rows.iter().map(|r| r.order_date).min()?;
    let end = rows.iter().map(|r| r.order_date).max()?;
    Some(DateWindow { start, end })
}

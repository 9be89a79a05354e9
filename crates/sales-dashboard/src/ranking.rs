use std::cmp::Reverse;
use std::collections::HashMap;

use ordered_float::OrderedFloat;
use sales_model::OrderRecord;
use serde::{Deserialize, Serialize};

/// Numeric order field that can be summed per group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Sales,
    Profit,
}

impl Metric {
    pub fn value(self, record: &OrderRecord) -> f64 {
        match self {
            Metric::Sales => record.sales,
            Metric::Profit => record.profit,
        }
    }
}

/// Text order field rows can be grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKey {
    Product,
    Region,
    Subregion,
}

impl GroupKey {
    pub fn key(self, record: &OrderRecord) -> &str {
        match self {
            GroupKey::Product => &record.product_name,
            GroupKey::Region => &record.region,
            GroupKey::Subregion => &record.subregion,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub label: String,
    pub value: f64,
}

/// Groups sorted by summed value, highest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub entries: Vec<RankedEntry>,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.entries.iter()
    }

    /// `(label, value)` pairs in rank order.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.entries
            .iter()
            .map(|e| (e.label.as_str(), e.value))
            .collect()
    }
}

/// Sum `metric` per `group_key` in first-seen key order.
pub(crate) fn group_sums<'r, T: 'r>(
    rows: impl IntoIterator<Item = &'r T>,
    group_key: impl Fn(&'r T) -> &'r str,
    metric: impl Fn(&'r T) -> f64,
) -> Vec<(&'r str, f64)> {
    let mut slots: HashMap<&'r str, usize> = HashMap::new();
    let mut groups: Vec<(&'r str, f64)> = Vec::new();

    for row in rows {
        let key = group_key(row);
        let value = metric(row);
        match slots.get(key) {
            Some(&idx) => groups[idx].1 += value,
            None => {
                slots.insert(key, groups.len());
                groups.push((key, value));
            }
        }
    }

    groups
}

/// Sort groups by value, highest first; equal values keep their first-seen order.
pub(crate) fn sort_descending<K>(groups: &mut [(K, f64)]) {
    // `sort_by_key` is stable, which is what makes tie order reproducible.
    groups.sort_by_key(|(_, value)| Reverse(OrderedFloat(*value)));
}

/// Group `rows` by `group_key`, sum `metric` per group, and return the `n` largest groups.
///
/// Returns fewer than `n` entries when there are fewer groups. Sums are not clamped, so
/// negative totals rank below zero. Ties keep the order in which their keys first appear in
/// `rows`.
pub fn top_n<'r, T: 'r>(
    rows: impl IntoIterator<Item = &'r T>,
    group_key: impl Fn(&'r T) -> &'r str,
    metric: impl Fn(&'r T) -> f64,
    n: usize,
) -> RankingResult {
    let mut groups = group_sums(rows, group_key, metric);
    sort_descending(&mut groups);
    groups.truncate(n);

    RankingResult {
        entries: groups
            .into_iter()
            .map(|(label, value)| RankedEntry {
                label: label.to_string(),
                value,
            })
            .collect(),
    }
}

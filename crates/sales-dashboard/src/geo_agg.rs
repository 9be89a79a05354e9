use sales_model::{GeoTable, OrderRecord};
use serde::Serialize;

use crate::ranking::{group_sums, sort_descending};
use crate::Metric;

/// One subregion total, with coordinates when the geo table knows the subregion.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoEntry {
    pub subregion: String,
    pub value: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoEntry {
    pub fn is_matched(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// A map-ready entry: coordinates are guaranteed and `intensity` is scaled to the largest
/// matched value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub subregion: String,
    pub value: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoAggregation {
    /// Every subregion total, highest first; ties keep first-seen order.
    pub entries: Vec<GeoEntry>,
    /// Subregions missing from the geo table, in first-seen order.
    pub unmatched_keys: Vec<String>,
    /// Sum over all entries, matched or not.
    pub total: f64,
    pub matched_total: f64,
    pub unmatched_total: f64,
    /// Largest value among matched entries, if any matched.
    pub max_matched_value: Option<f64>,
}

impl GeoAggregation {
    /// Denominator for intensity scaling; 1.0 when nothing matched or the maximum is not
    /// positive.
    pub fn intensity_denominator(&self) -> f64 {
        match self.max_matched_value {
            Some(max) if max > 0.0 => max,
            _ => 1.0,
        }
    }

    /// Matched entries only, in entry order.
    pub fn map_points(&self) -> Vec<MapPoint> {
        let denominator = self.intensity_denominator();
        self.entries
            .iter()
            .filter_map(|entry| {
                let (latitude, longitude) = (entry.latitude?, entry.longitude?);
                Some(MapPoint {
                    subregion: entry.subregion.clone(),
                    value: entry.value,
                    latitude,
                    longitude,
                    intensity: entry.value / denominator,
                })
            })
            .collect()
    }
}

/// Total `metric` per subregion and left-join the totals against `geo`.
///
/// Subregions without a coordinate entry stay in `entries` (with absent coordinates) and in
/// every total, and are listed in `unmatched_keys`.
pub fn aggregate_by_subregion<'r>(
    rows: impl IntoIterator<Item = &'r OrderRecord>,
    geo: &GeoTable,
    metric: Metric,
) -> GeoAggregation {
    let mut groups = group_sums(rows, |r| r.subregion.as_str(), |r| metric.value(r));

    let mut result = GeoAggregation::default();
    for (subregion, value) in &groups {
        if geo.get(subregion).is_some() {
            result.matched_total += value;
            result.max_matched_value = Some(match result.max_matched_value {
                Some(max) => max.max(*value),
                None => *value,
            });
        } else {
            result.unmatched_total += value;
            result.unmatched_keys.push(subregion.to_string());
        }
    }
    result.total = result.matched_total + result.unmatched_total;

    sort_descending(&mut groups);
    result.entries = groups
        .into_iter()
        .map(|(subregion, value)| {
            let coordinate = geo.get(subregion);
            GeoEntry {
                subregion: subregion.to_string(),
                value,
                latitude: coordinate.map(|c| c.latitude),
                longitude: coordinate.map(|c| c.longitude),
            }
        })
        .collect();

    if !result.unmatched_keys.is_empty() {
        log::debug!(
            "{} of {} subregions have no coordinates",
            result.unmatched_keys.len(),
            result.entries.len()
        );
    }

    result
}

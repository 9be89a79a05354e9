use sales_model::{Dataset, GeoTable, OrderRecord};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::filter::{resolve, Choice, DateWindow, FilterSelection};
use crate::geo_agg::{aggregate_by_subregion, GeoAggregation, MapPoint};
use crate::label::wrap_label;
use crate::ranking::{top_n, GroupKey, Metric, RankingResult};
use crate::warning::Warning;

/// Control values for one interaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(flatten)]
    pub selection: FilterSelection,
    /// Include the filtered rows in the view.
    pub show_rows: bool,
}

impl RenderRequest {
    pub fn new(selection: FilterSelection) -> Self {
        Self {
            selection,
            show_rows: false,
        }
    }

    pub fn with_rows(mut self) -> Self {
        self.show_rows = true;
        self
    }
}

/// One bar of a ranking chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    /// The group key as it appears in the data.
    pub key: String,
    /// `key` wrapped for the chart axis.
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub region_options: Vec<Choice>,
    pub subregion_options: Vec<Choice>,
    pub available_dates: DateWindow,
    pub row_count: usize,
    pub top_sales: Vec<ChartBar>,
    pub top_profit: Vec<ChartBar>,
    pub geo: GeoAggregation,
    pub map_points: Vec<MapPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<OrderRecord>>,
    pub warnings: Vec<Warning>,
}

/// Run the whole pipeline for one interaction.
pub fn render(
    dataset: &Dataset,
    geo: &GeoTable,
    request: &RenderRequest,
    config: &DashboardConfig,
) -> DashboardView {
    let resolution = resolve(dataset, request.selection.clone(), config.fallback_window);
    let rows = &resolution.rows;

    let ranking = |metric: Metric| {
        top_n(
            rows.iter().copied(),
            |r| GroupKey::Product.key(r),
            |r| metric.value(r),
            config.top_n,
        )
    };
    let top_sales = chart_bars(&ranking(Metric::Sales), config);
    let top_profit = chart_bars(&ranking(Metric::Profit), config);

    let geo_aggregation = aggregate_by_subregion(rows.iter().copied(), geo, Metric::Sales);
    let map_points = geo_aggregation.map_points();

    let mut warnings = resolution.warnings;
    if !geo_aggregation.unmatched_keys.is_empty() {
        log::warn!(
            "no coordinates for {} subregions: {}",
            geo_aggregation.unmatched_keys.len(),
            geo_aggregation.unmatched_keys.join(", ")
        );
        warnings.push(Warning::GeoLookupMiss {
            keys: geo_aggregation.unmatched_keys.clone(),
        });
    }

    log::debug!(
        "rendered {} of {} rows (region={}, subregion={})",
        rows.len(),
        dataset.len(),
        resolution.selection.region,
        resolution.selection.subregion,
    );

    DashboardView {
        row_count: rows.len(),
        rows: request
            .show_rows
            .then(|| rows.iter().map(|r| (*r).clone()).collect()),
        available_dates: resolution.available,
        selection: resolution.selection,
        region_options: resolution.region_options,
        subregion_options: resolution.subregion_options,
        top_sales,
        top_profit,
        geo: geo_aggregation,
        map_points,
        warnings,
    }
}

fn chart_bars(ranking: &RankingResult, config: &DashboardConfig) -> Vec<ChartBar> {
    ranking
        .iter()
        .map(|entry| ChartBar {
            key: entry.label.clone(),
            label: wrap_label(&entry.label, config.label_width, &config.line_break),
            value: entry.value,
        })
        .collect()
}

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_dashboard::{aggregate_by_subregion, GeoEntry, Metric};
use sales_model::{GeoCoordinate, GeoTable, OrderRecord};

fn order(subregion: &str, sales: f64, profit: f64) -> OrderRecord {
    let date = NaiveDate::from_ymd_opt(2019, 2, 14).unwrap();
    OrderRecord::new("Central", subregion, "Widget", sales, profit, date)
}

#[test]
fn joins_totals_with_coordinates() {
    let geo = GeoTable::us_states();
    let texas = geo.get("Texas").unwrap().clone();
    let rows = vec![order("Texas", 100.0, 20.0), order("Texas", 50.0, -5.0)];

    let result = aggregate_by_subregion(&rows, &geo, Metric::Sales);

    assert_eq!(
        result.entries,
        vec![GeoEntry {
            subregion: "Texas".to_string(),
            value: 150.0,
            latitude: Some(texas.latitude),
            longitude: Some(texas.longitude),
        }]
    );
    assert!(result.unmatched_keys.is_empty());
    assert_eq!(result.total, 150.0);
    assert_eq!(result.max_matched_value, Some(150.0));

    let points = result.map_points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].intensity, 1.0);
}

#[test]
fn unmatched_subregions_stay_in_totals_but_off_the_map() {
    let geo = GeoTable::us_states();
    let rows = vec![
        order("Texas", 80.0, 1.0),
        order("Puerto Rico", 40.0, 1.0),
        order("Ohio", 20.0, 1.0),
    ];

    let result = aggregate_by_subregion(&rows, &geo, Metric::Sales);

    assert_eq!(result.unmatched_keys, vec!["Puerto Rico".to_string()]);
    assert_eq!(result.total, 140.0);
    assert_eq!(result.matched_total, 100.0);
    assert_eq!(result.unmatched_total, 40.0);
    assert_eq!(result.matched_total + result.unmatched_total, result.total);

    let ranked: Vec<(&str, bool)> = result
        .entries
        .iter()
        .map(|e| (e.subregion.as_str(), e.is_matched()))
        .collect();
    assert_eq!(
        ranked,
        vec![("Texas", true), ("Puerto Rico", false), ("Ohio", true)]
    );

    let points: Vec<(String, f64)> = result
        .map_points()
        .into_iter()
        .map(|p| (p.subregion, p.intensity))
        .collect();
    assert_eq!(
        points,
        vec![("Texas".to_string(), 1.0), ("Ohio".to_string(), 0.25)]
    );
}

#[test]
fn nothing_matched_uses_unit_denominator() {
    let geo = GeoTable::us_states();
    let rows = vec![order("Ontario", 12.0, 1.0), order("Quebec", 8.0, 1.0)];

    let result = aggregate_by_subregion(&rows, &geo, Metric::Sales);

    assert_eq!(result.max_matched_value, None);
    assert_eq!(result.intensity_denominator(), 1.0);
    assert_eq!(result.unmatched_keys, vec!["Ontario", "Quebec"]);
    assert!(result.map_points().is_empty());
    assert_eq!(result.total, 20.0);
}

#[test]
fn non_positive_maximum_uses_unit_denominator() {
    let geo = GeoTable::us_states();
    let rows = vec![order("Texas", 0.0, -30.0), order("Ohio", 0.0, -10.0)];

    let result = aggregate_by_subregion(&rows, &geo, Metric::Profit);

    assert_eq!(result.max_matched_value, Some(-10.0));
    assert_eq!(result.intensity_denominator(), 1.0);
    let intensities: Vec<f64> = result.map_points().iter().map(|p| p.intensity).collect();
    assert_eq!(intensities, vec![-10.0, -30.0]);
}

#[test]
fn lookup_is_exact() {
    let geo = GeoTable::from_entries([GeoCoordinate {
        subregion: "Texas".to_string(),
        latitude: 31.0,
        longitude: -97.5,
    }])
    .unwrap();
    let rows = vec![order("texas", 5.0, 1.0), order("Texas ", 5.0, 1.0)];

    let result = aggregate_by_subregion(&rows, &geo, Metric::Sales);

    assert_eq!(result.unmatched_keys, vec!["texas", "Texas "]);
    assert_eq!(result.matched_total, 0.0);
}

#[test]
fn empty_rows_give_an_empty_aggregation() {
    let rows: Vec<OrderRecord> = Vec::new();
    let result = aggregate_by_subregion(&rows, &GeoTable::us_states(), Metric::Sales);
    assert!(result.entries.is_empty());
    assert_eq!(result.total, 0.0);
    assert_eq!(result.intensity_denominator(), 1.0);
}

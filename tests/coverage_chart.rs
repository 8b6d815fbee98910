//! Coverage chart data built from analysis-style breakpoint payloads

use serde_json::json;
use virtool_client::coverage::{
    build_chart_series, expand, trim_outliers_by_iqr, y_max, Breakpoint, ChartLayout, CoveragePoint,
};

fn breakpoints(raw: serde_json::Value) -> Vec<Breakpoint> {
    serde_json::from_value(raw).unwrap()
}

#[test]
fn test_known_encoding_expands_densely() {
    let series = breakpoints(json!([[2, 5], [4, 5], [6, 2]]));

    let points = expand(&series, 7);

    let expected: Vec<CoveragePoint> = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 2.0]
        .iter()
        .enumerate()
        .map(|(i, &value)| CoveragePoint { position: i as u64, value })
        .collect();
    assert_eq!(points, expected);
}

#[test]
fn test_trim_example_and_idempotence() {
    let sorted: Vec<CoveragePoint> = [1.0, 2.0, 2.0, 3.0, 100.0]
        .iter()
        .enumerate()
        .map(|(i, &value)| CoveragePoint { position: i as u64, value })
        .collect();

    let trimmed = trim_outliers_by_iqr(&sorted).to_vec();
    assert!(trimmed.iter().all(|p| p.value != 100.0));
    assert_eq!(trimmed.len(), 4);

    let mut resorted = trimmed.clone();
    resorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    assert_eq!(trim_outliers_by_iqr(&resorted), &resorted[..]);
}

#[test]
fn test_chart_lengths_for_many_references() {
    let references = [
        (json!([[0, 12], [40, 30], [41, 2000], [42, 28], [120, 28]]), 120u64),
        (json!([[0, 0], [10, 1], [300, 1]]), 300),
        (json!([[5, 3]]), 5),
    ];

    for (raw, length) in references {
        let series = breakpoints(raw);

        let full = build_chart_series(&series, length, false);
        let cropped = build_chart_series(&series, length, true);

        assert_eq!(full.len() as u64, length);
        assert!(cropped.len() as u64 <= length);
        assert!(!cropped.is_empty());
        assert!(cropped.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

#[test]
fn test_spike_is_cropped_for_display() {
    let series = breakpoints(json!([[0, 12], [40, 30], [41, 2000], [42, 28], [120, 28]]));

    let cropped = build_chart_series(&series, 120, true);

    assert!(cropped.iter().all(|&(_, depth)| depth < 2000.0));
    assert_eq!(cropped.len(), 119);
    assert_eq!(y_max(&series), 2000.0);
}

#[test]
fn test_layout_projects_chart_into_plot_area() {
    let series = breakpoints(json!([[0, 4], [500, 8], [1000, 8]]));
    let chart = build_chart_series(&series, 1000, false);
    let layout = ChartLayout::new(1000, 300.0, true);

    let pixels = layout.project(&chart, y_max(&series));

    assert_eq!(pixels.len(), 1000);
    assert!(pixels.iter().all(|&(x, y)| (0.0..=layout.width).contains(&x) && (0.0..=layout.height).contains(&y)));
    assert_eq!(pixels[999].1, 0.0);
}

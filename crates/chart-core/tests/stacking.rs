// File: crates/chart-core/tests/stacking.rs
// Purpose: Cumulative offsets and collision shifts of value labels on stacked charts.
// Plot at (40, 20), 350x250; X axis 0..4 => 87.5 px per unit.

use chart_core::{Axis, Chart, Insets, PlotGeometry, RenderOptions, Series, SeriesLabels, SeriesType, ValueLabels};
use serde_json::json;

const EPS: f64 = 1e-9;

fn geometry() -> PlotGeometry {
    PlotGeometry::from_render_options(&RenderOptions { width: 400, height: 300, insets: Insets::new(40, 10, 20, 30) })
}

fn stacked_chart(y_max: f64, stack: bool, series: Vec<Vec<(f64, f64)>>) -> Chart {
    let mut chart = Chart::new();
    *chart.x_axis_mut() = Axis::new("X", 0.0, 4.0);
    *chart.y_axis_mut() = Axis::new("Y", 0.0, y_max);
    chart.options.stack = stack;
    for data in series {
        chart.add_series(Series::with_data(SeriesType::Histogram, data));
    }
    chart.set_plugin_options("valueLabels", json!({ "show": true }));
    chart
}

fn layout(chart: &Chart) -> Vec<SeriesLabels> {
    ValueLabels::new().layout(chart, &geometry()).expect("layout")
}

fn anchors_y(s: &SeriesLabels) -> Vec<f64> {
    s.labels.iter().map(|l| l.anchor_y).collect()
}

fn assert_close(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len(), "{got:?} vs {want:?}");
    for (g, w) in got.iter().zip(want) {
        assert!((g - w).abs() < EPS, "{got:?} vs {want:?}");
    }
}

#[test]
fn second_series_sits_on_the_first() {
    // Y axis 0..10 => 25 px per unit; series B is drawn at the cumulative value 2.
    let chart = stacked_chart(10.0, true, vec![vec![(0.0, 1.0), (1.0, 1.0)], vec![(0.0, 1.0), (1.0, 1.0)]]);
    let out = layout(&chart);
    assert_close(&anchors_y(&out[0]), &[233.0, 233.0]);
    assert_close(&anchors_y(&out[1]), &[208.0, 208.0]);
    // Texts show each series' own value, not the cumulative one.
    assert!(out[1].labels.iter().all(|l| l.text == "1"));
}

#[test]
fn close_stacked_labels_are_lifted_by_the_stack_gap() {
    // Y axis 0..100 => 2.5 px per unit; B's anchor (253) is only 2.5px above A's (255.5).
    let chart = stacked_chart(100.0, true, vec![vec![(0.0, 1.0), (1.0, 1.0)], vec![(0.0, 1.0), (1.0, 1.0)]]);
    let out = layout(&chart);
    assert_close(&anchors_y(&out[0]), &[255.5, 255.5]);
    assert_close(&anchors_y(&out[1]), &[241.0, 241.0]);
}

#[test]
fn stacking_labels_every_point_even_with_repeated_values() {
    let data = vec![(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)];
    let stacked = layout(&stacked_chart(10.0, true, vec![data.clone()]));
    assert_eq!(stacked[0].labels.len(), 3);

    let flat = layout(&stacked_chart(10.0, false, vec![data]));
    let idx: Vec<usize> = flat[0].labels.iter().map(|l| l.point_index).collect();
    assert_eq!(idx, vec![0, 2]);
}

#[test]
fn third_series_accumulates_both_below_it() {
    let s = vec![(0.0, 1.0)];
    let out = layout(&stacked_chart(10.0, true, vec![s.clone(), s.clone(), s]));
    // cumulative 1, 2, 3 => 225, 200, 175 px, lifted 12 and offset by the top inset
    assert_close(&anchors_y(&out[2]), &[183.0]);
}

#[test]
fn points_past_the_first_series_length_are_not_offset() {
    let chart = stacked_chart(10.0, true, vec![vec![(0.0, 1.0), (1.0, 1.0)], vec![(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)]]);
    let out = layout(&chart);
    let last = out[1].labels.last().expect("label for the extra point");
    assert_eq!(last.point_index, 2);
    assert!((last.anchor_y - 233.0).abs() < EPS);
}

#[test]
fn stacking_state_does_not_leak_between_redraws() {
    let chart = stacked_chart(10.0, true, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(0.0, 3.0), (1.0, 1.0)]]);
    assert_eq!(layout(&chart), layout(&chart));
}

#[test]
fn hidden_zero_labels_still_count_towards_the_stack() {
    // A's label at index 0 reads 0 and is hidden, but its bar (4) is still drawn below B.
    let mut chart = stacked_chart(10.0, true, vec![vec![(0.0, 4.0), (1.0, 4.0)], vec![(0.0, 1.0), (1.0, 1.0)]]);
    let a = chart.series[0].clone().with_value_label_fn(|ctx| {
        if ctx.point_index == 0 {
            0.0
        } else {
            ctx.series.data[ctx.point_index].as_ref().map_or(0.0, |p| p.y)
        }
    });
    chart.series[0] = a;
    chart.set_plugin_options("valueLabels", json!({ "show": true, "hideZero": true }));

    let out = layout(&chart);
    let idx: Vec<usize> = out[0].labels.iter().map(|l| l.point_index).collect();
    assert_eq!(idx, vec![1]);
    // cumulative 5 => 125px, lifted 12 and offset by the top inset, at both indices
    assert_close(&anchors_y(&out[1]), &[133.0, 133.0]);
}

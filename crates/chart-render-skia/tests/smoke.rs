// File: crates/chart-render-skia/tests/smoke.rs
// Purpose: End-to-end raster rendering with value labels enabled, canvas and markup modes.

use chart_core::{Axis, Chart, Insets, MarkupLayer, Plot, RenderOptions, Series, SeriesType, ValueLabels};
use chart_render_skia::{find_theme, render_to_png, render_to_png_bytes, render_to_rgba8, SkiaTextMeasurer, Theme};
use serde_json::json;

fn plot(stack: bool, options: serde_json::Value) -> Plot {
    let mut chart = Chart::new();
    *chart.x_axis_mut() = Axis::new("Day", 0.0, 4.0);
    chart.options.stack = stack;
    chart.add_series(Series::with_data(SeriesType::Histogram, vec![(0.0, 3.0), (1.0, 5.0), (2.0, 2.0), (3.0, 4.0)]));
    chart.add_series(Series::with_data(SeriesType::Line, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 2.0), (3.0, 6.0)]));
    chart.autoscale_axes(0.1);
    chart.set_plugin_options("valueLabels", options);
    let mut plot = Plot::new(chart, RenderOptions { width: 400, height: 300, insets: Insets::new(48, 12, 24, 40) });
    plot.register(ValueLabels::new());
    plot
}

#[test]
fn renders_png_with_value_labels() {
    let mut p = plot(true, json!({ "show": true, "fontColor": "#ff8800" }));
    let bytes = render_to_png_bytes(&mut p, &Theme::dark()).expect("render");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!(img.dimensions(), (400, 300));
}

#[test]
fn frame_is_painted_with_the_theme_background() {
    let mut p = plot(false, json!({ "show": false }));
    let theme = Theme::light();
    let pixels = render_to_rgba8(&mut p, &theme).expect("render");
    assert_eq!(pixels.len(), 400 * 300 * 4);
    // top-left corner lies outside the plot area and its labels
    let bg = theme.background;
    assert_eq!(&pixels[..4], &[bg.r(), bg.g(), bg.b(), bg.a()]);
}

#[test]
fn markup_labels_are_measured_with_font_metrics() {
    let mut p = plot(false, json!({ "show": true, "renderAsMarkup": true, "align": "center" }))
        .with_placeholder(MarkupLayer::with_measurer(Box::new(SkiaTextMeasurer::new())));
    render_to_png_bytes(&mut p, &find_theme("light")).expect("render");
    assert_eq!(p.placeholder().containers().len(), 2);
    assert!(p.placeholder().labels().count() > 0);
}

#[test]
fn writes_png_file() {
    let dir = std::env::temp_dir().join(format!("value-labels-smoke-{}", std::process::id()));
    let path = dir.join("chart.png");
    let mut p = plot(true, json!({ "show": true }));
    render_to_png(&mut p, &Theme::dark(), &path).expect("render to file");
    let bytes = std::fs::read(&path).expect("read back");
    assert!(bytes.starts_with(b"\x89PNG"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unknown_theme_falls_back_to_dark() {
    assert_eq!(find_theme("LIGHT").name, "light");
    assert_eq!(find_theme("neon").name, "dark");
}

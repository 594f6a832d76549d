// File: crates/demo/src/main.rs
// Summary: Demo loads a CSV (x column + one column per series) and renders it with value labels.
//
// Usage: constellation-demo [FILE.csv] [--stack] [--markup] [--last-only] [--theme NAME]

use anyhow::{bail, Context, Result};
use chart_core::{Axis, Chart, DataPoint, Plot, RenderOptions, Series, SeriesType, ValueLabels, XValue};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SAMPLE_CSV: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sales.csv");

#[derive(Debug)]
struct Args {
    input: PathBuf,
    stack: bool,
    markup: bool,
    last_only: bool,
    theme: String,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        input: PathBuf::from(SAMPLE_CSV),
        stack: false,
        markup: false,
        last_only: false,
        theme: "dark".to_string(),
    };
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--stack" => args.stack = true,
            "--markup" => args.markup = true,
            "--last-only" => args.last_only = true,
            "--theme" => args.theme = it.next().context("--theme needs a name")?,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            path => args.input = PathBuf::from(path),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    tracing::info!(input = %args.input.display(), stack = args.stack, markup = args.markup, "starting demo");

    let table = load_table(&args.input).with_context(|| format!("failed to load CSV '{}'", args.input.display()))?;
    if table.series.is_empty() {
        bail!("no value columns found; expected an x column followed by one column per series");
    }
    tracing::info!(rows = table.rows, series = table.series.len(), "loaded table");

    let mut chart = Chart::new();
    chart.options.stack = args.stack;
    let kind = if args.stack { SeriesType::Histogram } else { SeriesType::Line };
    for (name, points) in table.series {
        chart.add_series(Series::with_points(kind, points).with_label(name));
    }
    let categorical = table.categories.is_some();
    *chart.x_axis_mut() = match table.categories {
        Some(categories) => Axis::new(&table.x_label, 0.0, 1.0).with_categories(categories),
        None => Axis::new(&table.x_label, 0.0, 1.0),
    };
    chart.autoscale_axes(0.1);
    if categorical {
        // keep the first and last bars fully inside the plot
        let x = chart.x_axis_mut();
        x.min -= 0.5;
        x.max += 0.5;
    }
    chart.y_axis_mut().label = "Value".to_string();
    chart.set_plugin_options(
        "valueLabels",
        json!({
            "show": true,
            "showLastValueOnly": args.last_only,
            "renderAsMarkup": args.markup,
            "hideZero": true,
        }),
    );

    let mut plot = Plot::new(chart, RenderOptions::default());
    if args.markup {
        plot = plot.with_placeholder(chart_core::MarkupLayer::with_measurer(Box::new(
            chart_render_skia::SkiaTextMeasurer::new(),
        )));
    }
    plot.register(ValueLabels::new().with_formatter(format_value));

    let theme = chart_render_skia::find_theme(&args.theme);
    let out = out_name_with(&args.input, "value_labels");
    chart_render_skia::render_to_png(&mut plot, &theme, &out)?;
    tracing::info!(path = %out.display(), "wrote chart");

    if args.markup {
        let html_path = out.with_extension("html");
        std::fs::write(&html_path, plot.placeholder().to_html())
            .with_context(|| format!("write {}", html_path.display()))?;
        tracing::info!(path = %html_path.display(), labels = plot.placeholder().labels().count(), "wrote label markup");
    }
    Ok(())
}

fn format_value(v: f64) -> String {
    if v == v.trunc() { format!("{v:.0}") } else { format!("{v:.1}") }
}

/// Produce output file name like target/out/chart_<stem>_<suffix>.png
fn out_name_with(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    PathBuf::from("target/out").join(format!("chart_{stem}_{suffix}.png"))
}

struct Table {
    x_label: String,
    /// Set when the x column is not numeric; names in first-seen order.
    categories: Option<Vec<String>>,
    series: Vec<(String, Vec<Option<DataPoint>>)>,
    rows: usize,
}

/// Load a CSV whose first column is x and every further column a series.
/// Empty or unparsable cells become absent points.
fn load_table(path: &Path) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    tracing::debug!(?headers, "csv headers");
    let Some((x_label, names)) = headers.split_first() else { bail!("CSV has no header row") };

    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    let numeric_x = records.iter().all(|r| r.get(0).is_some_and(|s| s.parse::<f64>().is_ok()));

    let mut categories: Vec<String> = Vec::new();
    let mut series: Vec<(String, Vec<Option<DataPoint>>)> =
        names.iter().map(|n| (n.clone(), Vec::with_capacity(records.len()))).collect();

    for rec in &records {
        let raw_x = rec.get(0).unwrap_or_default();
        let x = match raw_x.parse::<f64>() {
            Ok(v) if numeric_x => XValue::Number(v),
            _ => {
                if !categories.iter().any(|c| c == raw_x) {
                    categories.push(raw_x.to_string());
                }
                XValue::Category(raw_x.to_string())
            }
        };
        for (col, (_, points)) in series.iter_mut().enumerate() {
            let y = rec.get(col + 1).and_then(|s| s.parse::<f64>().ok());
            points.push(y.map(|y| DataPoint { x: x.clone(), y }));
        }
    }

    Ok(Table {
        x_label: x_label.clone(),
        categories: (!numeric_x).then_some(categories),
        series,
        rows: records.len(),
    })
}

// File: crates/chart-render-skia/src/render.rs
// Summary: CPU raster rendering of a Plot: frame, series, then the registered draw hooks.

use anyhow::{anyhow, bail, Context, Result};
use chart_core::{Axis, AxisTransform, Chart, Direction, Plot, PlotGeometry, Series, SeriesType};
use skia_safe as skia;

use crate::canvas::SkiaCanvas;
use crate::text::TextShaper;
use crate::theme::Theme;

const AXIS_FONT_PX: f32 = 12.0;
const TITLE_FONT_PX: f32 = 14.0;
const GRID_COLUMNS: usize = 10;
const GRID_ROWS: usize = 6;
/// Fraction of the per-point slot a histogram bar occupies.
const BAR_FILL: f32 = 0.6;

/// Render the plot into an RGBA8 buffer (row-major, unpremultiplied).
pub fn render_to_rgba8(plot: &mut Plot, theme: &Theme) -> Result<Vec<u8>> {
    let (w, h) = (plot.render.width, plot.render.height);
    let mut surface =
        skia::surfaces::raster_n32_premul((w, h)).ok_or_else(|| anyhow!("failed to create {w}x{h} raster surface"))?;
    {
        let canvas = surface.canvas();
        draw_frame(canvas, &plot.chart, &plot.geometry(), theme)?;
        let mut text = SkiaCanvas::new(canvas, theme.value_label);
        plot.run_draw_hooks(&mut text);
    }

    let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let row_bytes = w as usize * 4;
    let mut pixels = vec![0u8; row_bytes * h as usize];
    if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
        bail!("reading back surface pixels failed");
    }
    Ok(pixels)
}

/// Render the plot and encode it as PNG.
pub fn render_to_png_bytes(plot: &mut Plot, theme: &Theme) -> Result<Vec<u8>> {
    let (w, h) = (plot.render.width as u32, plot.render.height as u32);
    let pixels = render_to_rgba8(plot, theme)?;
    let img = image::RgbaImage::from_raw(w, h, pixels).context("pixel buffer does not match surface size")?;
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).context("encode PNG")?;
    Ok(out.into_inner())
}

/// Render the plot to a PNG file, creating parent directories as needed.
pub fn render_to_png(plot: &mut Plot, theme: &Theme, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
    let path = output_png_path.as_ref();
    let bytes = render_to_png_bytes(plot, theme)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(path = %path.display(), theme = theme.name, "wrote chart PNG");
    Ok(())
}

fn draw_frame(canvas: &skia::Canvas, chart: &Chart, g: &PlotGeometry, theme: &Theme) -> Result<()> {
    canvas.clear(theme.background);
    let shaper = TextShaper::new();
    draw_grid(canvas, g, theme);
    draw_axes(canvas, &shaper, chart.x_axis(), chart.y_axis(), g, theme);

    let plot_rect = skia::Rect::from_xywh(g.left as f32, g.top as f32, g.width as f32, g.height as f32);
    canvas.save();
    canvas.clip_rect(plot_rect, skia::ClipOp::Intersect, true);
    let drawn = draw_series(canvas, chart, g, theme);
    canvas.restore();
    drawn
}

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 {
        return vec![start, end];
    }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

fn draw_grid(canvas: &skia::Canvas, g: &PlotGeometry, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    let (l, t, r, b) = (g.left as f32, g.top as f32, g.right() as f32, g.bottom() as f32);
    for x in linspace(g.left, g.right(), GRID_COLUMNS) {
        canvas.draw_line((x as f32, t), (x as f32, b), &paint);
    }
    for y in linspace(g.top, g.bottom(), GRID_ROWS) {
        canvas.draw_line((l, y as f32), (r, y as f32), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, shaper: &TextShaper, x: &Axis, y: &Axis, g: &PlotGeometry, theme: &Theme) {
    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(theme.axis_line);
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.5);

    let (l, t, r, b) = (g.left as f32, g.top as f32, g.right() as f32, g.bottom() as f32);
    canvas.draw_line((l, b), (r, b), &axis_paint);
    canvas.draw_line((l, t), (l, b), &axis_paint);

    // y tick values at the horizontal grid lines
    if !y.is_categorical() {
        let ty = AxisTransform::for_axis(y, Direction::Vertical, g);
        for py in linspace(0.0, g.height, GRID_ROWS) {
            let text = format_tick(ty.c2p(py));
            let (w, _) = shaper.measure(&text, AXIS_FONT_PX);
            let baseline = (py + g.top) as f32 + AXIS_FONT_PX * 0.4;
            shaper.draw_left(canvas, &text, l - w - 6.0, baseline, AXIS_FONT_PX, theme.axis_label);
        }
    }

    let (xw, _) = shaper.measure(&x.label, TITLE_FONT_PX);
    shaper.draw_left(canvas, &x.label, r - xw, b + 36.0, TITLE_FONT_PX, theme.axis_label);
    shaper.draw_left(canvas, &y.label, 4.0, (t - 6.0).max(TITLE_FONT_PX), TITLE_FONT_PX, theme.axis_label);
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 100.0 || v == v.trunc() {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// A resolved point in surface pixels; `base` is where a bar starts.
#[derive(Clone, Copy)]
struct PixelPoint {
    x: f32,
    y: f32,
    base: f32,
}

fn draw_series(canvas: &skia::Canvas, chart: &Chart, g: &PlotGeometry, theme: &Theme) -> Result<()> {
    // cumulative sums by point index when stacking
    let mut stacked: Vec<f64> = Vec::new();
    for (si, s) in chart.series.iter().enumerate() {
        let (x_axis, y_axis) = chart.axes_for(si)?;
        let tx = AxisTransform::for_axis(x_axis, Direction::Horizontal, g);
        let ty = AxisTransform::for_axis(y_axis, Direction::Vertical, g);

        let points: Vec<Option<PixelPoint>> = s
            .data
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let p = p.as_ref()?;
                let x = x_axis.resolve(&p.x)?;
                let mut base = 0.0;
                let mut y = p.y;
                if chart.options.stack {
                    if stacked.len() <= i {
                        stacked.resize(i + 1, 0.0);
                    }
                    base = stacked[i];
                    y += base;
                    stacked[i] = y;
                }
                Some(PixelPoint {
                    x: (tx.p2c(x) + g.left) as f32,
                    y: (ty.p2c(y) + g.top) as f32,
                    base: (ty.p2c(base) + g.top) as f32,
                })
            })
            .collect();

        let color = theme.series_color(si);
        match s.series_type {
            SeriesType::Line => draw_line_series(canvas, &points, color),
            SeriesType::Histogram => draw_histogram_series(canvas, s, &points, g, color),
        }
    }
    Ok(())
}

fn draw_line_series(canvas: &skia::Canvas, points: &[Option<PixelPoint>], color: skia::Color) {
    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(2.0);
    stroke.set_color(color);

    // absent points break the line
    let mut path = skia::Path::new();
    let mut pen_down = false;
    for p in points {
        match p {
            Some(p) if pen_down => {
                path.line_to((p.x, p.y));
            }
            Some(p) => {
                path.move_to((p.x, p.y));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    canvas.draw_path(&path, &stroke);

    // isolated points would otherwise be invisible
    let mut dot = skia::Paint::default();
    dot.set_anti_alias(true);
    dot.set_color(color);
    for (i, p) in points.iter().enumerate() {
        let Some(p) = p else { continue };
        let prev = i.checked_sub(1).and_then(|j| points[j]).is_some();
        let next = points.get(i + 1).copied().flatten().is_some();
        if !prev && !next {
            canvas.draw_circle((p.x, p.y), 2.5, &dot);
        }
    }
}

fn draw_histogram_series(
    canvas: &skia::Canvas,
    series: &Series,
    points: &[Option<PixelPoint>],
    g: &PlotGeometry,
    color: skia::Color,
) {
    let slot = g.width as f32 / series.len().max(1) as f32;
    let half = (slot * BAR_FILL / 2.0).max(0.5);
    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_color(color);

    for p in points.iter().flatten() {
        let (top, bottom) = if p.y <= p.base { (p.y, p.base) } else { (p.base, p.y) };
        let rect = skia::Rect::from_ltrb(p.x - half, top, p.x + half, bottom);
        canvas.draw_rect(rect, &fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0, 4.0]);
    }

    #[test]
    fn ticks_drop_decimals_for_whole_and_large_values() {
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(123.456), "123");
        assert_eq!(format_tick(0.25), "0.25");
    }
}

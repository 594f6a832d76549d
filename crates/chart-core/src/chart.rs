// File: crates/chart-core/src/chart.rs
// Summary: Chart model, host options and the Plot host that runs post-draw hooks.

use serde_json::{Map, Value};

use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::geometry::PlotGeometry;
use crate::markup::MarkupLayer;
use crate::plugin::{merge_defaults, DrawContext, DrawHook};
use crate::series::Series;
use crate::surface::TextCanvas;
use crate::types::RenderOptions;

/// Per-plugin option values keyed by plugin name.
pub type PluginOptions = Map<String, Value>;

#[derive(Clone, Debug, Default)]
pub struct ChartOptions {
    /// Draw series cumulatively on top of each other (positionally, by point index).
    pub stack: bool,
    pub plugins: PluginOptions,
}

#[derive(Clone, Debug)]
pub struct Chart {
    pub series: Vec<Series>,
    pub x_axes: Vec<Axis>,
    pub y_axes: Vec<Axis>,
    pub options: ChartOptions,
}

impl Chart {
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            x_axes: vec![Axis::default_x()],
            y_axes: vec![Axis::default_y()],
            options: ChartOptions::default(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn x_axis(&self) -> &Axis { &self.x_axes[0] }
    pub fn y_axis(&self) -> &Axis { &self.y_axes[0] }
    pub fn x_axis_mut(&mut self) -> &mut Axis { &mut self.x_axes[0] }
    pub fn y_axis_mut(&mut self) -> &mut Axis { &mut self.y_axes[0] }

    /// The (x, y) axes a series is bound to.
    pub fn axes_for(&self, series_index: usize) -> Result<(&Axis, &Axis)> {
        let s = &self.series[series_index];
        let x = self.x_axes.get(s.x_axis).ok_or(Error::UnknownAxis {
            series: series_index,
            axis: "x",
            index: s.x_axis,
        })?;
        let y = self.y_axes.get(s.y_axis).ok_or(Error::UnknownAxis {
            series: series_index,
            axis: "y",
            index: s.y_axis,
        })?;
        Ok((x, y))
    }

    /// Set options for a plugin, replacing anything stored under `name`.
    pub fn set_plugin_options(&mut self, name: &str, value: Value) {
        self.options.plugins.insert(name.to_string(), value);
    }

    /// Fit every axis to the data bound to it, padding y ranges by `margin_frac` of their span.
    /// With stacking enabled, y ranges cover the cumulative sums.
    pub fn autoscale_axes(&mut self, margin_frac: f64) {
        let nx = self.x_axes.len();
        let ny = self.y_axes.len();
        let mut xr = vec![(f64::INFINITY, f64::NEG_INFINITY); nx];
        let mut yr = vec![(f64::INFINITY, f64::NEG_INFINITY); ny];
        let mut stacked: Vec<f64> = Vec::new();

        for s in &self.series {
            let (Some(x_axis), true) = (self.x_axes.get(s.x_axis), s.y_axis < ny) else { continue };
            for (i, p) in s.data.iter().enumerate() {
                let Some(p) = p else { continue };
                let Some(x) = x_axis.resolve(&p.x) else { continue };
                let mut y = p.y;
                if self.options.stack {
                    if stacked.len() <= i {
                        stacked.resize(i + 1, 0.0);
                    }
                    y += stacked[i];
                    stacked[i] = y;
                }
                let (lo, hi) = &mut xr[s.x_axis];
                *lo = lo.min(x);
                *hi = hi.max(x);
                let (lo, hi) = &mut yr[s.y_axis];
                *lo = lo.min(y);
                *hi = hi.max(y);
            }
        }

        for (axis, (lo, hi)) in self.x_axes.iter_mut().zip(xr) {
            if lo.is_finite() && hi.is_finite() {
                axis.min = lo;
                axis.max = if (hi - lo).abs() < 1e-9 { lo + 1.0 } else { hi };
            }
        }
        for (axis, (lo, hi)) in self.y_axes.iter_mut().zip(yr) {
            if lo.is_finite() && hi.is_finite() {
                let hi = if (hi - lo).abs() < 1e-9 { lo + 1.0 } else { hi };
                let m = (hi - lo) * margin_frac;
                axis.min = lo - m;
                axis.max = hi + m;
            }
        }
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

/// Host for one chart on one surface: owns the chart, registered hooks and the
/// markup placeholder that hooks may populate.
pub struct Plot {
    pub chart: Chart,
    pub render: RenderOptions,
    hooks: Vec<Box<dyn DrawHook>>,
    placeholder: MarkupLayer,
}

impl Plot {
    pub fn new(chart: Chart, render: RenderOptions) -> Self {
        Self { chart, render, hooks: Vec::new(), placeholder: MarkupLayer::new() }
    }

    pub fn with_placeholder(mut self, placeholder: MarkupLayer) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Register a post-draw hook and merge its default options under any the user already set.
    pub fn register(&mut self, hook: impl DrawHook + 'static) {
        let name = hook.name();
        let defaults = hook.default_options();
        let entry = self
            .chart
            .options
            .plugins
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        merge_defaults(entry, &defaults);
        tracing::debug!("Registered draw hook: {} v{}", name, hook.version());
        self.hooks.push(Box::new(hook));
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn geometry(&self) -> PlotGeometry {
        PlotGeometry::from_render_options(&self.render)
    }

    pub fn placeholder(&self) -> &MarkupLayer {
        &self.placeholder
    }

    pub fn placeholder_mut(&mut self) -> &mut MarkupLayer {
        &mut self.placeholder
    }

    /// Run every hook, in registration order, against `canvas`.
    /// A failing hook is logged and skipped for this frame; the others still run.
    pub fn run_draw_hooks(&mut self, canvas: &mut dyn TextCanvas) {
        let geometry = self.geometry();
        for hook in &self.hooks {
            let mut ctx = DrawContext {
                chart: &self.chart,
                geometry,
                canvas: &mut *canvas,
                placeholder: &mut self.placeholder,
            };
            if let Err(e) = hook.draw(&mut ctx) {
                tracing::error!("Draw hook '{}' failed: {}", hook.name(), e);
            }
        }
    }
}

// File: crates/chart-core/src/value_labels.rs
// Summary: `valueLabels` draw hook: places value labels next to data points and declutters them.
// Notes:
// - One pass per redraw. Layout (`layout_labels`) is pure; `ValueLabels::draw` emits the
//   result either as canvas text or as positioned markup in the host placeholder.
// - Stacking offsets are positional: point i of every series stacks on point i of the
//   series before it. Series are expected to share the first series' length.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::geometry::PlotGeometry;
use crate::markup::{LabelClass, LabelContainer, MarkupLabel, MarkupLayer};
use crate::plugin::{DrawContext, DrawHook};
use crate::scale::{AxisTransform, Direction};
use crate::series::{Series, ValueLabelContext};
use crate::style::{FontSpec, Rgba, TextAlign, TextShadow};
use crate::surface::TextCanvas;
use crate::Chart;

pub const PLUGIN_NAME: &str = "valueLabels";
pub const PLUGIN_VERSION: &str = "1.2";

/// Class of every per-series container in markup mode.
pub const CONTAINER_CLASS: &str = "valueLabels";

/// Blur radius of the legibility shadow drawn behind canvas labels.
const SHADOW_BLUR: f32 = 1.5;

/// Older option names, accepted and rewritten to the current ones.
const LEGACY_KEYS: [(&str, &str); 6] = [
    ("showAsHtml", "renderAsMarkup"),
    ("showLastValue", "showLastValueOnly"),
    ("plotAxis", "targetAxis"),
    ("fontcolor", "fontColor"),
    ("xoffset", "xOffset"),
    ("yoffset", "yOffset"),
];

/// Which coordinate of a point is shown as its label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAxis {
    X,
    #[default]
    Y,
}

/// Pixel constants of the decluttering and stacking heuristics.
/// The defaults are tuned for a ~12px label font.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclutterOptions {
    /// A label is kept if it moved vertically by more than this from the previous one...
    pub min_vertical_gap: f64,
    /// ...or starts right of the previous label, whose width is estimated at this many px per char.
    pub char_width: f64,
    /// Minimum vertical distance between stacked labels at the same point index.
    pub stack_gap: f64,
    /// Distance the label anchor sits above its point.
    pub label_lift: f64,
    /// Baseline offset below the anchor for canvas text.
    pub baseline_drop: f64,
    /// Baseline used, below the plot top, for labels whose anchor is at or above the plot top.
    pub top_pin: f64,
}

impl Default for DeclutterOptions {
    fn default() -> Self {
        Self {
            min_vertical_gap: 20.0,
            char_width: 8.0,
            stack_gap: 12.0,
            label_lift: 12.0,
            baseline_drop: 6.0,
            top_pin: 18.0,
        }
    }
}

/// Options of the `valueLabels` hook, resolved once per redraw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueLabelOptions {
    pub show: bool,
    pub render_as_markup: bool,
    pub show_last_value_only: bool,
    pub align: TextAlign,
    pub target_axis: TargetAxis,
    pub hide_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<Rgba>,
    pub x_offset: f64,
    pub y_offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSpec>,
    pub declutter: DeclutterOptions,
}

impl Default for ValueLabelOptions {
    fn default() -> Self {
        Self {
            show: false,
            render_as_markup: false,
            show_last_value_only: false,
            align: TextAlign::Start,
            target_axis: TargetAxis::Y,
            hide_zero: false,
            font_color: None,
            x_offset: 0.0,
            y_offset: 0.0,
            font: None,
            declutter: DeclutterOptions::default(),
        }
    }
}

impl ValueLabelOptions {
    /// Resolve options from the host option map entry. Missing keys take their defaults;
    /// unknown keys and malformed values are rejected.
    pub fn resolve(value: Option<&Value>) -> Result<Self> {
        Self::resolve_with(value, &Self::default())
    }

    /// Like [`resolve`](Self::resolve), against the defaults a hook contributed at registration.
    /// A legacy key only replaces its current name while that name still holds the default.
    pub fn resolve_with(value: Option<&Value>, defaults: &Self) -> Result<Self> {
        let mut value = match value {
            None | Some(Value::Null) => return Ok(defaults.clone()),
            Some(v) => v.clone(),
        };
        if let Value::Object(map) = &mut value {
            let defaults = serde_json::to_value(defaults).unwrap_or_default();
            rename_legacy_keys(map, &defaults);
        }
        serde_json::from_value(value).map_err(|source| Error::InvalidOptions { plugin: PLUGIN_NAME, source })
    }
}

fn rename_legacy_keys(map: &mut Map<String, Value>, defaults: &Value) {
    for (old, new) in LEGACY_KEYS {
        let Some(v) = map.remove(old) else { continue };
        match map.get(new) {
            Some(current) if Some(current) != defaults.get(new) => {
                tracing::debug!("Option '{old}' ignored: '{new}' is set explicitly");
            }
            _ => {
                map.insert(new.to_string(), v);
            }
        }
    }
}

pub type LabelFormatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Shortest decimal that round-trips: `2.0 -> "2"`, `2.5 -> "2.5"`.
pub fn default_formatter(v: f64) -> String {
    v.to_string()
}

/// One label to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelCandidate {
    pub text: String,
    pub series_index: usize,
    pub point_index: usize,
    /// Anchor in surface pixels: above the point, stacking applied, before edge pinning.
    pub anchor_x: f64,
    pub anchor_y: f64,
    /// Canvas draw position (text baseline) after pinning and user offsets.
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesLabels {
    pub series_index: usize,
    pub labels: Vec<LabelCandidate>,
}

/// Per-redraw stacking accumulators, indexed by point index.
#[derive(Debug)]
struct StackState {
    /// Cumulative data value of the series stacked so far.
    values: Vec<f64>,
    /// Label anchor y of the previous series.
    label_y: Vec<f64>,
}

impl StackState {
    fn new(len: usize) -> Self {
        Self { values: vec![0.0; len], label_y: vec![0.0; len] }
    }
}

/// The last label emitted in the current series.
#[derive(Debug)]
struct LastLabel {
    text: Option<String>,
    /// Estimated right edge of the label.
    right: f64,
    y: f64,
}

impl Default for LastLabel {
    fn default() -> Self {
        Self { text: None, right: -1000.0, y: -1000.0 }
    }
}

/// Compute the labels of every series for one frame.
///
/// Points are skipped when absent, not the final present point while `show_last_value_only` is set,
/// outside either axis' `[min, max]`, or zero while `hide_zero` is set. A label is
/// a candidate when its text differs from the previous label of the series, when it
/// is the series' final point, or always when stacking; candidates are kept only if
/// they clear the previous label vertically or start to its right.
pub fn layout_labels(
    chart: &Chart,
    geometry: &PlotGeometry,
    opts: &ValueLabelOptions,
    formatter: &dyn Fn(f64) -> String,
) -> Result<Vec<SeriesLabels>> {
    let stacking = chart.options.stack;
    let mut stack = StackState::new(chart.series.first().map_or(0, Series::len));
    if stacking && chart.series.iter().any(|s| s.len() != stack.values.len()) {
        tracing::warn!(
            "Stacked series differ in length; value labels past index {} are not stacked",
            stack.values.len()
        );
    }

    let d = &opts.declutter;
    let mut out = Vec::with_capacity(chart.series.len());

    for (si, series) in chart.series.iter().enumerate() {
        let (x_axis, y_axis) = chart.axes_for(si)?;
        let tx = AxisTransform::for_axis(x_axis, Direction::Horizontal, geometry);
        let ty = AxisTransform::for_axis(y_axis, Direction::Vertical, geometry);
        let last_index = series.last_present_index();
        let mut last = LastLabel::default();
        let mut labels = Vec::new();

        for (pi, point) in series.data.iter().enumerate() {
            let is_last = Some(pi) == last_index;
            let Some(point) = point else { continue };
            if opts.show_last_value_only && !is_last {
                continue;
            }
            let Some(x) = x_axis.resolve(&point.x) else {
                tracing::trace!("series {si} point {pi}: unresolved x {:?}", point.x);
                continue;
            };
            let y = point.y;
            if !x_axis.contains(x) || !y_axis.contains(y) {
                tracing::trace!("series {si} point {pi}: outside viewport");
                continue;
            }

            // Stacking runs before any label is hidden: the bars below still occupy their height.
            let anchor_x = tx.p2c(x) + geometry.left;
            let mut y_stacked = y;
            if stacking {
                if let Some(acc) = stack.values.get_mut(pi) {
                    y_stacked += *acc;
                    *acc = y_stacked;
                }
            }
            let mut anchor_y = ty.p2c(y_stacked) - d.label_lift + geometry.top;
            if stacking {
                if let Some(prev) = stack.label_y.get_mut(pi) {
                    if si > 0 && *prev - anchor_y < d.stack_gap {
                        anchor_y -= d.stack_gap;
                    }
                    *prev = anchor_y;
                }
            }

            let value = match &series.value_label_fn {
                Some(f) => f(&ValueLabelContext { series, series_index: si, point_index: pi }),
                None => match opts.target_axis {
                    TargetAxis::X => x,
                    TargetAxis::Y => y,
                },
            };
            if opts.hide_zero && value == 0.0 {
                continue;
            }
            let text = formatter(value);

            let changed = last.text.as_deref() != Some(text.as_str());
            if !(changed || is_last || stacking) {
                continue;
            }

            if (anchor_y - last.y).abs() <= d.min_vertical_gap && last.right >= anchor_x {
                tracing::trace!("series {si} point {pi}: too close to previous label");
                continue;
            }
            last = LastLabel {
                right: anchor_x + text.chars().count() as f64 * d.char_width,
                y: anchor_y,
                text: Some(text.clone()),
            };

            let (x, y) = draw_position(anchor_x, anchor_y, geometry, opts);
            labels.push(LabelCandidate {
                text,
                series_index: si,
                point_index: pi,
                anchor_x,
                anchor_y,
                x,
                y,
            });
        }
        out.push(SeriesLabels { series_index: si, labels });
    }
    Ok(out)
}

/// Canvas baseline for an anchor: dropped below it, pinned inside the plot's top and
/// right edges, then shifted by the user offsets.
fn draw_position(anchor_x: f64, anchor_y: f64, geometry: &PlotGeometry, opts: &ValueLabelOptions) -> (f64, f64) {
    let d = &opts.declutter;
    let mut x = anchor_x;
    let mut y = anchor_y + d.baseline_drop;
    if anchor_y <= geometry.top {
        y = geometry.top + d.top_pin;
    }
    if anchor_x >= geometry.right() {
        x = geometry.right();
    }
    (x + opts.x_offset, y + opts.y_offset)
}

fn emit_text(canvas: &mut dyn TextCanvas, label: &LabelCandidate, opts: &ValueLabelOptions) {
    if let Some(font) = &opts.font {
        canvas.set_font(font);
    }
    canvas.set_fill_color(opts.font_color);
    canvas.set_shadow(TextShadow { offset_x: 0.0, offset_y: 0.0, blur: SHADOW_BLUR, color: opts.font_color });
    canvas.set_text_align(opts.align);
    canvas.fill_text(&label.text, label.x, label.y);
}

/// Replace each series' container in the placeholder, then center labels if asked to.
/// Centering needs rendered widths, so it runs after all containers are inserted.
fn emit_markup(placeholder: &mut MarkupLayer, layout: &[SeriesLabels], opts: &ValueLabelOptions) {
    let mut inserted = Vec::with_capacity(layout.len());
    for s in layout {
        let id = container_id(s.series_index);
        placeholder.remove(&id);
        let mut container = LabelContainer::new(id.clone(), CONTAINER_CLASS);
        for l in &s.labels {
            for class in [LabelClass::Light, LabelClass::Normal] {
                container.labels.push(MarkupLabel { class, left: l.anchor_x, top: l.anchor_y, text: l.text.clone() });
            }
        }
        placeholder.append(container);
        inserted.push(id);
    }
    if opts.align == TextAlign::Center {
        let font_size = opts.font.as_ref().map(|f| f64::from(f.size_px));
        placeholder.for_each_label_measured(&inserted, font_size, |label, width| label.left -= width / 2.0);
    }
}

/// Id of the markup container holding the labels of series `series_index`.
pub fn container_id(series_index: usize) -> String {
    format!("valueLabels{series_index}")
}

/// The `valueLabels` draw hook.
#[derive(Clone)]
pub struct ValueLabels {
    formatter: LabelFormatter,
    defaults: ValueLabelOptions,
}

impl ValueLabels {
    pub fn new() -> Self {
        Self { formatter: Arc::new(default_formatter), defaults: ValueLabelOptions::default() }
    }

    /// Map each label value to its display text.
    pub fn with_formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.formatter = Arc::new(f);
        self
    }

    /// Defaults contributed to the host option map at registration.
    pub fn with_defaults(mut self, defaults: ValueLabelOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Options currently stored for this hook on `chart`.
    pub fn options(&self, chart: &Chart) -> Result<ValueLabelOptions> {
        ValueLabelOptions::resolve_with(chart.options.plugins.get(PLUGIN_NAME), &self.defaults)
    }

    /// Lay out labels for `chart` without drawing them; ignores `show`.
    pub fn layout(&self, chart: &Chart, geometry: &PlotGeometry) -> Result<Vec<SeriesLabels>> {
        let opts = self.options(chart)?;
        layout_labels(chart, geometry, &opts, self.formatter.as_ref())
    }
}

impl Default for ValueLabels {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawHook for ValueLabels {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn version(&self) -> &'static str {
        PLUGIN_VERSION
    }

    fn default_options(&self) -> Value {
        serde_json::to_value(&self.defaults).unwrap_or_default()
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> Result<()> {
        let opts = ValueLabelOptions::resolve_with(ctx.plugin_options(PLUGIN_NAME), &self.defaults)?;
        if !opts.show {
            return Ok(());
        }
        let layout = layout_labels(ctx.chart, &ctx.geometry, &opts, self.formatter.as_ref())?;
        if opts.render_as_markup {
            emit_markup(&mut *ctx.placeholder, &layout, &opts);
        } else {
            for label in layout.iter().flat_map(|s| s.labels.iter()) {
                emit_text(&mut *ctx.canvas, label, &opts);
            }
        }
        tracing::debug!(
            "Value labels: {} labels over {} series (markup: {})",
            layout.iter().map(|s| s.labels.len()).sum::<usize>(),
            layout.len(),
            opts.render_as_markup
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_round_trip_through_the_option_map() {
        let hook = ValueLabels::new();
        let resolved = ValueLabelOptions::resolve(Some(&hook.default_options())).unwrap();
        assert_eq!(resolved, ValueLabelOptions::default());
    }

    #[test]
    fn legacy_keys_are_accepted() {
        let v = json!({ "show": true, "showAsHtml": true, "showLastValue": true, "plotAxis": "x", "fontcolor": "#f00" });
        let o = ValueLabelOptions::resolve(Some(&v)).unwrap();
        assert!(o.render_as_markup && o.show_last_value_only);
        assert_eq!(o.target_axis, TargetAxis::X);
        assert_eq!(o.font_color, Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn legacy_key_overrides_merged_default() {
        let v = json!({ "renderAsMarkup": false, "showAsHtml": true });
        assert!(ValueLabelOptions::resolve(Some(&v)).unwrap().render_as_markup);
    }

    #[test]
    fn explicit_current_key_beats_legacy_alias() {
        let v = json!({ "renderAsMarkup": true, "showAsHtml": false, "targetAxis": "x", "plotAxis": "y" });
        let o = ValueLabelOptions::resolve(Some(&v)).unwrap();
        assert!(o.render_as_markup);
        assert_eq!(o.target_axis, TargetAxis::X);
    }

    #[test]
    fn legacy_alias_replaces_a_custom_registered_default() {
        let defaults = ValueLabelOptions { render_as_markup: true, ..ValueLabelOptions::default() };
        let v = json!({ "renderAsMarkup": true, "showAsHtml": false });
        assert!(!ValueLabelOptions::resolve_with(Some(&v), &defaults).unwrap().render_as_markup);
    }

    #[test]
    fn bad_values_are_rejected() {
        for v in [json!({ "shw": true }), json!({ "align": "middle" }), json!({ "font": "Arial" }), json!({ "fontColor": "red" })] {
            let err = ValueLabelOptions::resolve(Some(&v)).unwrap_err();
            assert!(matches!(err, Error::InvalidOptions { plugin: PLUGIN_NAME, .. }), "{v}");
        }
    }

    #[test]
    fn draw_position_pins_to_plot_edges() {
        let g = PlotGeometry::new(10.0, 20.0, 100.0, 100.0);
        let o = ValueLabelOptions::default();
        assert_eq!(draw_position(50.0, 60.0, &g, &o), (50.0, 66.0));
        assert_eq!(draw_position(50.0, 20.0, &g, &o), (50.0, 38.0));
        assert_eq!(draw_position(110.0, 60.0, &g, &o), (110.0, 66.0));
        assert_eq!(draw_position(150.0, 60.0, &g, &o), (110.0, 66.0));
        let o = ValueLabelOptions { x_offset: 2.0, y_offset: -3.0, ..ValueLabelOptions::default() };
        assert_eq!(draw_position(50.0, 60.0, &g, &o), (52.0, 63.0));
    }
}

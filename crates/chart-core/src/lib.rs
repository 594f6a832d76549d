// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the host chart model, draw hooks and value labels.

pub mod axis;
pub mod chart;
pub mod error;
pub mod geometry;
pub mod markup;
pub mod plugin;
pub mod scale;
pub mod series;
pub mod style;
pub mod surface;
pub mod types;
pub mod value_labels;

pub use axis::{Axis, AxisMode, ScaleKind};
pub use chart::{Chart, ChartOptions, Plot, PluginOptions};
pub use error::{Error, Result};
pub use geometry::PlotGeometry;
pub use markup::{HeuristicTextMeasurer, LabelClass, LabelContainer, MarkupLabel, MarkupLayer, TextMeasurer};
pub use plugin::{DrawContext, DrawHook};
pub use scale::{AxisTransform, Direction};
pub use series::{DataPoint, Series, SeriesType, ValueLabelContext, XValue};
pub use style::{FontSpec, Rgba, TextAlign, TextShadow};
pub use surface::{CanvasCall, RecordingCanvas, TextCanvas};
pub use types::{Insets, RenderOptions};
pub use value_labels::{
    layout_labels, LabelCandidate, SeriesLabels, TargetAxis, ValueLabelOptions, ValueLabels,
};

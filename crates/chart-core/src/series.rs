// File: crates/chart-core/src/series.rs
// Summary: Series model for line and histogram data with absent points and axis bindings.

use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesType {
    Line,
    Histogram, // (x, y) bars from 0.0 (or from the stack below)
}

/// Raw x coordinate: numeric, or a category name resolved through the x axis.
#[derive(Clone, Debug, PartialEq)]
pub enum XValue {
    Number(f64),
    Category(String),
}

impl From<f64> for XValue {
    fn from(v: f64) -> Self {
        XValue::Number(v)
    }
}

impl From<&str> for XValue {
    fn from(name: &str) -> Self {
        XValue::Category(name.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub x: XValue,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: impl Into<XValue>, y: f64) -> Self {
        Self { x: x.into(), y }
    }
}

/// Arguments handed to a per-series value extractor.
#[derive(Clone, Copy)]
pub struct ValueLabelContext<'a> {
    pub series: &'a Series,
    pub series_index: usize,
    pub point_index: usize,
}

pub type ValueExtractor = Arc<dyn Fn(&ValueLabelContext<'_>) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct Series {
    pub series_type: SeriesType,
    pub label: Option<String>,
    pub data: Vec<Option<DataPoint>>, // None = absent point
    pub x_axis: usize,                // index into Chart::x_axes
    pub y_axis: usize,                // index into Chart::y_axes
    pub value_label_fn: Option<ValueExtractor>,
}

impl Series {
    pub fn new(series_type: SeriesType) -> Self {
        Self { series_type, label: None, data: Vec::new(), x_axis: 0, y_axis: 0, value_label_fn: None }
    }

    /// Build from plain numeric (x, y) pairs; every point is present.
    pub fn with_data(series_type: SeriesType, data: Vec<(f64, f64)>) -> Self {
        let data = data.into_iter().map(|(x, y)| Some(DataPoint::new(x, y))).collect();
        Self { data, ..Self::new(series_type) }
    }

    /// Build from points that may be absent.
    pub fn with_points(series_type: SeriesType, data: Vec<Option<DataPoint>>) -> Self {
        Self { data, ..Self::new(series_type) }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn on_axes(mut self, x_axis: usize, y_axis: usize) -> Self {
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self
    }

    /// Override the value shown in this series' labels.
    pub fn with_value_label_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValueLabelContext<'_>) -> f64 + Send + Sync + 'static,
    {
        self.value_label_fn = Some(Arc::new(f));
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index of the final present point; trailing absent points are ignored.
    pub fn last_present_index(&self) -> Option<usize> {
        self.data.iter().rposition(Option::is_some)
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("series_type", &self.series_type)
            .field("label", &self.label)
            .field("points", &self.data.len())
            .field("x_axis", &self.x_axis)
            .field("y_axis", &self.y_axis)
            .field("value_label_fn", &self.value_label_fn.is_some())
            .finish()
    }
}

// File: crates/chart-core/src/axis.rs
// Summary: Axis model with labels, visible ranges and optional category tables.

use std::collections::HashMap;

use crate::series::XValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Log10,
}

/// How raw x values are interpreted on this axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AxisMode {
    #[default]
    Numeric,
    /// Category name -> position on the axis.
    Categories(HashMap<String, f64>),
}

#[derive(Clone, Debug)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub kind: ScaleKind,
    pub mode: AxisMode,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, kind: ScaleKind::Linear, mode: AxisMode::Numeric }
    }

    pub fn default_x() -> Self {
        Self::new("X", 0.0, 10.0)
    }

    pub fn default_y() -> Self {
        Self::new("Y", 0.0, 100.0)
    }

    pub fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Switch to category mode; categories are placed at 0, 1, 2, ... in the given order.
    pub fn with_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.into(), i as f64))
            .collect();
        self.mode = AxisMode::Categories(table);
        self
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.mode, AxisMode::Categories(_))
    }

    /// Resolve a raw x value to a numeric position on this axis.
    /// Category names only resolve on a categorical axis that knows them.
    pub fn resolve(&self, x: &XValue) -> Option<f64> {
        match (x, &self.mode) {
            (XValue::Number(v), _) => Some(*v),
            (XValue::Category(name), AxisMode::Categories(table)) => table.get(name).copied(),
            (XValue::Category(_), AxisMode::Numeric) => None,
        }
    }

    /// Inclusive viewport test.
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_resolve_by_name() {
        let axis = Axis::new("Month", 0.0, 2.0).with_categories(["jan", "feb", "mar"]);
        assert!(axis.is_categorical());
        assert_eq!(axis.resolve(&XValue::Category("feb".into())), Some(1.0));
        assert_eq!(axis.resolve(&XValue::Category("dec".into())), None);
        assert_eq!(axis.resolve(&XValue::Number(2.0)), Some(2.0));
    }

    #[test]
    fn numeric_axis_rejects_category_names() {
        let axis = Axis::default_x();
        assert_eq!(axis.resolve(&XValue::Category("a".into())), None);
    }

    #[test]
    fn viewport_is_inclusive() {
        let axis = Axis::new("Y", 0.0, 5.0);
        assert!(axis.contains(0.0));
        assert!(axis.contains(5.0));
        assert!(!axis.contains(5.000001));
    }
}

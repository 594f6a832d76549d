// File: crates/chart-core/src/scale.rs
// Summary: Data -> pixel transforms for X/Y axes (linear and log10), relative to the plot origin.

use crate::axis::{Axis, ScaleKind};
use crate::geometry::PlotGeometry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Pixels grow with the value (x axes).
    Horizontal,
    /// Pixels shrink as the value grows (y axes, 0 at the top).
    Vertical,
}

/// Axis transform for one frame. `p2c` maps a data value to a pixel offset
/// inside the plot area; callers add the plot offset themselves.
#[derive(Clone, Copy, Debug)]
pub struct AxisTransform {
    pub direction: Direction,
    pub length_px: f64,
    pub log: bool,
    // endpoints in the transformed domain (log10 when `log`)
    lo: f64,
    hi: f64,
}

impl AxisTransform {
    pub fn new_linear(direction: Direction, length_px: f64, vmin: f64, vmax: f64) -> Self {
        let hi = if (vmax - vmin).abs() < 1e-12 { vmin + 1.0 } else { vmax };
        Self { direction, length_px, log: false, lo: vmin, hi }
    }

    pub fn new_log10(direction: Direction, length_px: f64, mut vmin: f64, mut vmax: f64) -> Self {
        // Ensure strictly positive range for log scale
        let eps = 1e-12;
        vmin = if vmin <= eps { eps } else { vmin };
        vmax = if vmax <= vmin { vmin * 10.0 } else { vmax };
        Self { direction, length_px, log: true, lo: vmin.log10(), hi: vmax.log10() }
    }

    pub fn for_axis(axis: &Axis, direction: Direction, geometry: &PlotGeometry) -> Self {
        let length_px = match direction {
            Direction::Horizontal => geometry.width,
            Direction::Vertical => geometry.height,
        };
        match axis.kind {
            ScaleKind::Linear => Self::new_linear(direction, length_px, axis.min, axis.max),
            ScaleKind::Log10 => Self::new_log10(direction, length_px, axis.min, axis.max),
        }
    }

    #[inline]
    pub fn p2c(&self, v: f64) -> f64 {
        let t = if self.log { v.max(1e-12).log10() } else { v };
        let span = (self.hi - self.lo).max(1e-12);
        let frac = (t - self.lo) / span;
        match self.direction {
            Direction::Horizontal => frac * self.length_px,
            Direction::Vertical => self.length_px - frac * self.length_px,
        }
    }

    #[inline]
    pub fn c2p(&self, px: f64) -> f64 {
        let frac = match self.direction {
            Direction::Horizontal => px / self.length_px,
            Direction::Vertical => (self.length_px - px) / self.length_px,
        };
        let t = self.lo + frac * (self.hi - self.lo);
        if self.log { 10f64.powf(t) } else { t }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_endpoints() {
        let x = AxisTransform::new_linear(Direction::Horizontal, 300.0, 0.0, 3.0);
        assert_eq!(x.p2c(0.0), 0.0);
        assert_eq!(x.p2c(3.0), 300.0);
        let y = AxisTransform::new_linear(Direction::Vertical, 200.0, 0.0, 10.0);
        assert_eq!(y.p2c(0.0), 200.0);
        assert_eq!(y.p2c(10.0), 0.0);
        assert!((y.c2p(y.p2c(4.0)) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn log_maps_decades_evenly() {
        let y = AxisTransform::new_log10(Direction::Vertical, 200.0, 1.0, 100.0);
        assert!((y.p2c(10.0) - 100.0).abs() < 1e-9);
        assert!((y.c2p(100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_range_does_not_divide_by_zero() {
        let x = AxisTransform::new_linear(Direction::Horizontal, 100.0, 2.0, 2.0);
        assert!(x.p2c(2.0).is_finite());
    }
}

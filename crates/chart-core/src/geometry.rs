// File: crates/chart-core/src/geometry.rs
// Summary: Plot-area geometry in surface pixels.

use crate::types::RenderOptions;

/// Pixel geometry of the plot area inside the drawing surface.
///
/// `left`/`top` are the plot offset from the surface origin; `width`/`height`
/// are the plot area size. Axis transforms produce coordinates relative to the
/// plot origin, so surface coordinates are `left + p2c(x)` and `top + p2c(y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotGeometry {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Plot area for a surface of the given size; degenerate sizes collapse to 1px.
    pub fn from_render_options(opts: &RenderOptions) -> Self {
        let w = (opts.width - opts.insets.hsum() as i32).max(1);
        let h = (opts.height - opts.insets.vsum() as i32).max(1);
        Self::new(opts.insets.left as f64, opts.insets.top as f64, w as f64, h as f64)
    }

    pub fn right(&self) -> f64 { self.left + self.width }
    pub fn bottom(&self) -> f64 { self.top + self.height }
}

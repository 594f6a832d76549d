// File: crates/chart-render-skia/src/lib.rs
// Summary: Skia raster backend: frame rendering, a TextCanvas for draw hooks, and font-backed measurement.

pub mod canvas;
pub mod render;
pub mod text;
pub mod theme;

pub use canvas::SkiaCanvas;
pub use render::{render_to_png, render_to_png_bytes, render_to_rgba8};
pub use text::{SkiaTextMeasurer, TextShaper};
pub use theme::{find as find_theme, Theme};

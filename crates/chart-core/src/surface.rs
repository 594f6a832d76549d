// File: crates/chart-core/src/surface.rs
// Summary: Renderer-agnostic 2D text canvas used by draw hooks, plus a recording implementation.

use crate::style::{FontSpec, Rgba, TextAlign, TextShadow};

/// The slice of a 2D drawing context that draw hooks need for text.
///
/// State setters behave like a canvas context: they stay in effect for
/// subsequent `fill_text` calls until changed.
pub trait TextCanvas {
    fn set_font(&mut self, font: &FontSpec);
    /// `None` keeps the backend's default text color.
    fn set_fill_color(&mut self, color: Option<Rgba>);
    fn set_shadow(&mut self, shadow: TextShadow);
    fn set_text_align(&mut self, align: TextAlign);
    /// Draw `text` with its baseline at `(x, y)` in surface pixels.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// Records a canvas call for verification in tests and headless runs.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCall {
    SetFont(FontSpec),
    SetFillColor(Option<Rgba>),
    SetShadow(TextShadow),
    SetTextAlign(TextAlign),
    FillText { text: String, x: f64, y: f64 },
}

/// A `TextCanvas` that only records what it was asked to do.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<CanvasCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `fill_text` calls as `(text, x, y)`, in draw order.
    pub fn texts(&self) -> Vec<(String, f64, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CanvasCall::FillText { text, x, y } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TextCanvas for RecordingCanvas {
    fn set_font(&mut self, font: &FontSpec) {
        self.calls.push(CanvasCall::SetFont(font.clone()));
    }

    fn set_fill_color(&mut self, color: Option<Rgba>) {
        self.calls.push(CanvasCall::SetFillColor(color));
    }

    fn set_shadow(&mut self, shadow: TextShadow) {
        self.calls.push(CanvasCall::SetShadow(shadow));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.calls.push(CanvasCall::SetTextAlign(align));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.calls.push(CanvasCall::FillText { text: text.to_string(), x, y });
    }
}

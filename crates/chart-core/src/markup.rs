// File: crates/chart-core/src/markup.rs
// Summary: DOM-like placeholder for positioned label markup, with text measurement hooks.

use std::fmt;

/// A minimal text measurement interface for positioned markup.
///
/// Backends with real shaping (see the skia crate) plug in here; otherwise
/// [`HeuristicTextMeasurer`] gives a rough estimate.
pub trait TextMeasurer {
    /// Returns `(width, height)` in pixels.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Assumes an average glyph width of ~0.6em and a height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelClass {
    /// Faint duplicate drawn underneath the normal label.
    Light,
    Normal,
}

impl LabelClass {
    pub fn class_name(self) -> &'static str {
        match self {
            LabelClass::Light => "valueLabelLight",
            LabelClass::Normal => "valueLabel",
        }
    }
}

/// One absolutely positioned text element.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkupLabel {
    pub class: LabelClass,
    pub left: f64,
    pub top: f64,
    pub text: String,
}

/// A group of label elements, addressable by id.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelContainer {
    pub id: String,
    pub class: String,
    pub labels: Vec<MarkupLabel>,
}

impl LabelContainer {
    pub fn new(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self { id: id.into(), class: class.into(), labels: Vec::new() }
    }
}

/// The host's placeholder element: the containers that draw hooks have inserted.
/// Lives across redraws; hooks are responsible for replacing their own containers.
pub struct MarkupLayer {
    containers: Vec<LabelContainer>,
    measurer: Box<dyn TextMeasurer>,
    font_size: f64,
}

impl MarkupLayer {
    pub fn new() -> Self {
        Self::with_measurer(Box::new(HeuristicTextMeasurer))
    }

    pub fn with_measurer(measurer: Box<dyn TextMeasurer>) -> Self {
        Self { containers: Vec::new(), measurer, font_size: 12.0 }
    }

    /// Font size used when measuring rendered label widths.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Remove the container with `id`; returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.containers.len();
        self.containers.retain(|c| c.id != id);
        before != self.containers.len()
    }

    pub fn append(&mut self, container: LabelContainer) {
        self.containers.push(container);
    }

    pub fn container(&self, id: &str) -> Option<&LabelContainer> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn containers(&self) -> &[LabelContainer] {
        &self.containers
    }

    pub fn labels(&self) -> impl Iterator<Item = &MarkupLabel> {
        self.containers.iter().flat_map(|c| c.labels.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn clear(&mut self) {
        self.containers.clear();
    }

    /// Rendered width of `text` at the layer's font size.
    pub fn measure_width(&self, text: &str) -> f64 {
        self.measurer.measure(text, self.font_size).0
    }

    /// Visit every label element of the containers named in `ids`, together with its rendered width
    /// at `font_size` (the layer's own size when `None`).
    pub fn for_each_label_measured(
        &mut self,
        ids: &[String],
        font_size: Option<f64>,
        mut f: impl FnMut(&mut MarkupLabel, f64),
    ) {
        let Self { containers, measurer, font_size: layer_size } = self;
        let size = font_size.unwrap_or(*layer_size);
        let selected = containers.iter_mut().filter(|c| ids.contains(&c.id));
        for label in selected.flat_map(|c| c.labels.iter_mut()) {
            let (width, _) = measurer.measure(&label.text, size);
            f(label, width);
        }
    }

    /// Serialize the placeholder contents as HTML fragments, one container per line.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for c in &self.containers {
            out.push_str(&format!(r#"<div id="{}" class="{}">"#, escape(&c.id), escape(&c.class)));
            for l in &c.labels {
                out.push_str(&format!(
                    r#"<div style="left:{}px;top:{}px;" class="{}">{}</div>"#,
                    l.left,
                    l.top,
                    l.class.class_name(),
                    escape(&l.text)
                ));
            }
            out.push_str("</div>\n");
        }
        out
    }
}

impl Default for MarkupLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkupLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupLayer")
            .field("containers", &self.containers)
            .field("font_size", &self.font_size)
            .finish_non_exhaustive()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str, text: &str) -> LabelContainer {
        let mut c = LabelContainer::new(id, "valueLabels");
        c.labels.push(MarkupLabel { class: LabelClass::Normal, left: 10.0, top: 20.5, text: text.into() });
        c
    }

    #[test]
    fn remove_by_id_only_touches_that_container() {
        let mut layer = MarkupLayer::new();
        layer.append(container("a", "1"));
        layer.append(container("b", "2"));
        assert!(layer.remove("a"));
        assert!(!layer.remove("a"));
        assert_eq!(layer.containers().len(), 1);
        assert!(layer.container("b").is_some());
    }

    #[test]
    fn html_is_escaped() {
        let mut layer = MarkupLayer::new();
        layer.append(container("valueLabels0", "<5 & up>"));
        assert_eq!(
            layer.to_html(),
            "<div id=\"valueLabels0\" class=\"valueLabels\"><div style=\"left:10px;top:20.5px;\" class=\"valueLabel\">&lt;5 &amp; up&gt;</div></div>\n"
        );
    }

    #[test]
    fn heuristic_width_scales_with_chars_and_size() {
        let layer = MarkupLayer::new().with_font_size(10.0);
        assert!((layer.measure_width("1234") - 24.0).abs() < 1e-9);
    }
}

// File: crates/chart-render-skia/src/canvas.rs
// Summary: TextCanvas implementation over a Skia canvas, so draw hooks can paint labels.

use chart_core::{FontSpec, Rgba, TextAlign, TextCanvas, TextShadow};
use skia_safe as skia;

const DEFAULT_FONT_PX: f32 = 12.0;

pub(crate) fn to_skia(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

/// Canvas-style text state (font, fill, shadow, align) applied to each `fill_text`.
pub struct SkiaCanvas<'a> {
    canvas: &'a skia::Canvas,
    font_mgr: skia::FontMgr,
    font: skia::Font,
    fill: skia::Color,
    default_fill: skia::Color,
    shadow: Option<TextShadow>,
    align: TextAlign,
}

impl<'a> SkiaCanvas<'a> {
    /// `default_fill` is used whenever a hook sets no fill color.
    pub fn new(canvas: &'a skia::Canvas, default_fill: skia::Color) -> Self {
        let font_mgr = skia::FontMgr::default();
        let font = match font_mgr.legacy_make_typeface(None::<&str>, skia::FontStyle::normal()) {
            Some(tf) => skia::Font::from_typeface(tf, DEFAULT_FONT_PX),
            None => {
                let mut f = skia::Font::default();
                f.set_size(DEFAULT_FONT_PX);
                f
            }
        };
        Self { canvas, font_mgr, font, fill: default_fill, default_fill, shadow: None, align: TextAlign::Start }
    }

    fn aligned_x(&self, text: &str, x: f32) -> f32 {
        let (advance, _) = self.font.measure_str(text, None);
        match self.align {
            TextAlign::Start | TextAlign::Left => x,
            TextAlign::Center => x - advance / 2.0,
            TextAlign::Right => x - advance,
        }
    }
}

impl TextCanvas for SkiaCanvas<'_> {
    fn set_font(&mut self, font: &FontSpec) {
        let style = if font.style.split_whitespace().any(|w| w.eq_ignore_ascii_case("bold")) {
            skia::FontStyle::bold()
        } else {
            skia::FontStyle::normal()
        };
        match self.font_mgr.match_family_style(&font.family, style) {
            Some(tf) => self.font = skia::Font::from_typeface(tf, font.size_px),
            None => {
                tracing::trace!(family = %font.family, "font family not found, keeping current typeface");
                self.font.set_size(font.size_px);
            }
        }
    }

    fn set_fill_color(&mut self, color: Option<Rgba>) {
        self.fill = color.map(to_skia).unwrap_or(self.default_fill);
    }

    fn set_shadow(&mut self, shadow: TextShadow) {
        self.shadow = Some(shadow);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let x = self.aligned_x(text, x as f32);
        let y = y as f32;
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);

        if let Some(sh) = self.shadow {
            if sh.blur > 0.0 || sh.offset_x != 0.0 || sh.offset_y != 0.0 {
                let mut shadow_paint = paint.clone();
                shadow_paint.set_color(sh.color.map(to_skia).unwrap_or(self.fill));
                // canvas shadow blur is twice the gaussian sigma
                if let Some(mf) = skia::MaskFilter::blur(skia::BlurStyle::Normal, sh.blur / 2.0, false) {
                    shadow_paint.set_mask_filter(mf);
                }
                self.canvas.draw_str(text, (x + sh.offset_x, y + sh.offset_y), &self.font, &shadow_paint);
            }
        }

        paint.set_color(self.fill);
        self.canvas.draw_str(text, (x, y), &self.font, &paint);
    }
}

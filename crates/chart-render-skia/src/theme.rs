// File: crates/chart-render-skia/src/theme.rs
// Summary: Light/Dark theming for frame colors, series palette and value label fallback color.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    /// Series colors, cycled by series index.
    pub palette: [skia::Color; 4],
    /// Used for value labels that set no color of their own.
    pub value_label: skia::Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 235, 235, 245),
            palette: [
                skia::Color::from_argb(255, 64, 160, 255),
                skia::Color::from_argb(255, 40, 200, 120),
                skia::Color::from_argb(255, 255, 170, 60),
                skia::Color::from_argb(255, 220, 80, 80),
            ],
            value_label: skia::Color::from_argb(255, 235, 235, 245),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            grid: skia::Color::from_argb(255, 230, 230, 235),
            axis_line: skia::Color::from_argb(255, 60, 60, 70),
            axis_label: skia::Color::from_argb(255, 20, 20, 30),
            palette: [
                skia::Color::from_argb(255, 32, 120, 200),
                skia::Color::from_argb(255, 20, 160, 90),
                skia::Color::from_argb(255, 220, 130, 20),
                skia::Color::from_argb(255, 200, 60, 60),
            ],
            value_label: skia::Color::from_argb(255, 20, 20, 30),
        }
    }

    pub fn series_color(&self, series_index: usize) -> skia::Color {
        self.palette[series_index % self.palette.len()]
    }
}

/// Built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or_else(Theme::dark)
}

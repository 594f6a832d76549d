// File: crates/chart-core/src/plugin.rs
// Summary: Draw hook trait (post-draw extensions) with a minimal, renderer-agnostic context.

use serde_json::Value;

use crate::error::Result;
use crate::geometry::PlotGeometry;
use crate::markup::MarkupLayer;
use crate::surface::TextCanvas;
use crate::Chart;

/// Everything a hook may read or draw into once the host has drawn the series.
pub struct DrawContext<'a> {
    pub chart: &'a Chart,
    pub geometry: PlotGeometry,
    pub canvas: &'a mut dyn TextCanvas,
    /// The host placeholder; persists across redraws.
    pub placeholder: &'a mut MarkupLayer,
}

impl DrawContext<'_> {
    /// Options stored for `plugin` in the chart's option map, if any.
    pub fn plugin_options(&self, plugin: &str) -> Option<&Value> {
        self.chart.options.plugins.get(plugin)
    }
}

/// Extension run by the host after each frame's series are drawn.
pub trait DrawHook {
    /// Key of this hook's options in `ChartOptions::plugins`.
    fn name(&self) -> &'static str;
    fn version(&self) -> &'static str;
    /// Defaults merged into the host option map at registration.
    fn default_options(&self) -> Value {
        Value::Object(Default::default())
    }
    fn draw(&self, ctx: &mut DrawContext<'_>) -> Result<()>;
}

/// Layer `defaults` under `current`: keys already present in `current` win.
/// Nested objects are merged recursively; anything else is left as the user set it.
pub fn merge_defaults(current: &mut Value, defaults: &Value) {
    if let (Value::Object(cur), Value::Object(def)) = (current, defaults) {
        for (k, dv) in def {
            match cur.get_mut(k) {
                Some(cv) => merge_defaults(cv, dv),
                None => {
                    cur.insert(k.clone(), dv.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_keys_survive_default_merge() {
        let mut cur = json!({ "show": true, "declutter": { "charWidth": 6.0 } });
        let def = json!({ "show": false, "align": "start", "declutter": { "charWidth": 8.0, "stackGap": 12.0 } });
        merge_defaults(&mut cur, &def);
        assert_eq!(
            cur,
            json!({ "show": true, "align": "start", "declutter": { "charWidth": 6.0, "stackGap": 12.0 } })
        );
    }
}

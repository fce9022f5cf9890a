//! # Render Engine
//!
//! Turns laid-out trees into a printer command stream in three steps:
//!
//! 1. **Flatten**: walk the tree, apply relative offsets, truncate text, align
//!    grid cells, and collect one [`RenderItem`] per printable leaf (one per
//!    glyph for vertical text).
//! 2. **Order**: stable sort by Y, then X. A dot-matrix printer feeds paper
//!    forward only, so the stream must visit items top to bottom.
//! 3. **Emit**: a [`RenderContext`] walks the sorted items, emitting only the
//!    movement and style commands each one needs.

pub mod context;
pub mod flatten;

pub use context::RenderContext;
pub use flatten::{flatten, truncate_text, RenderItem, RenderPayload};

use serde::{Deserialize, Serialize};

use crate::error::PlatenError;
use crate::escp::{CharTable, Charset};
use crate::layout::LayoutResult;
use crate::measure::DEFAULT_LINE_SPACING;
use crate::style::ResolvedStyle;

/// Settings for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Head position when the pass starts, in dots.
    pub start_x: f64,
    pub start_y: f64,
    pub charset: Charset,
    pub char_table: CharTable,
    /// Height of one text line in dots. 60 dots is 6 LPI.
    pub line_spacing: f64,
    /// Extra dots reserved after each glyph when measuring.
    pub inter_char_space: f64,
    /// Style the document starts from. Nodes inherit from it.
    pub initial_style: ResolvedStyle,
    /// Fail on backward paper movement instead of skipping it.
    pub strict_mode: bool,
    /// Emit `ESC @` first.
    pub initialize: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            charset: Charset::default(),
            char_table: CharTable::default(),
            line_spacing: DEFAULT_LINE_SPACING,
            inter_char_space: 0.0,
            initial_style: ResolvedStyle::default(),
            strict_mode: false,
            initialize: true,
        }
    }
}

impl RenderOptions {
    /// Height of one line of text in `style`.
    pub fn line_height(&self, style: &ResolvedStyle) -> f64 {
        let ls = self.line_spacing.max(0.0);
        if style.double_height {
            ls * 2.0
        } else {
            ls
        }
    }
}

/// The result of a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// ESC/P command bytes, ready to send to the printer.
    pub commands: Vec<u8>,
    /// Vertical head position after the last item, in dots.
    pub final_y: f64,
}

/// Stable sort by Y, then X.
pub fn sort_render_items(items: &mut [RenderItem]) {
    items.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
}

/// Render one layout tree.
pub fn render(result: &LayoutResult, options: &RenderOptions) -> Result<RenderOutput, PlatenError> {
    render_all(std::slice::from_ref(result), options)
}

/// Render several trees in one device pass. Their items are merged and
/// ordered together, so overlays and body content interleave correctly.
pub fn render_all(
    results: &[LayoutResult],
    options: &RenderOptions,
) -> Result<RenderOutput, PlatenError> {
    let mut items: Vec<RenderItem> = results
        .iter()
        .flat_map(|result| flatten(result, options))
        .collect();
    sort_render_items(&mut items);

    let mut ctx = RenderContext::new(options);
    ctx.begin();
    for item in &items {
        ctx.emit_item(item)?;
    }
    let (commands, final_y) = ctx.finish();
    Ok(RenderOutput { commands, final_y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Orientation;

    fn item(x: f64, y: f64, label: &str) -> RenderItem {
        RenderItem {
            x,
            y,
            width: 36.0,
            height: 60.0,
            style: ResolvedStyle::default(),
            payload: RenderPayload::Text {
                content: label.into(),
                orientation: Orientation::Horizontal,
            },
        }
    }

    fn labels(items: &[RenderItem]) -> Vec<&str> {
        items
            .iter()
            .map(|i| match &i.payload {
                RenderPayload::Text { content, .. } => content.as_str(),
                RenderPayload::Line { .. } => "-",
            })
            .collect()
    }

    #[test]
    fn sort_orders_by_y_then_x() {
        let mut items = vec![
            item(100.0, 60.0, "d"),
            item(200.0, 0.0, "b"),
            item(0.0, 60.0, "c"),
            item(0.0, 0.0, "a"),
        ];
        sort_render_items(&mut items);
        assert_eq!(labels(&items), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        let mut items = vec![item(0.0, 0.0, "first"), item(0.0, 0.0, "second")];
        sort_render_items(&mut items);
        assert_eq!(labels(&items), vec!["first", "second"]);
        let once = items.clone();
        sort_render_items(&mut items);
        assert_eq!(items, once);
    }

    #[test]
    fn options_from_partial_json() {
        let opts: RenderOptions =
            serde_json::from_str(r#"{ "strictMode": true, "lineSpacing": 30 }"#).unwrap();
        assert!(opts.strict_mode);
        assert!(opts.initialize);
        assert_eq!(opts.line_spacing, 30.0);
        assert_eq!(opts.char_table, CharTable::Pc437);
    }

    #[test]
    fn initial_style_is_emitted_after_init() {
        let opts = RenderOptions {
            initial_style: ResolvedStyle {
                print_quality: crate::style::PrintQuality::Lq,
                ..Default::default()
            },
            ..Default::default()
        };
        let out = render_all(&[], &opts).unwrap();
        assert_eq!(
            out.commands,
            vec![0x1B, b'@', 0x1B, b'R', 0, 0x1B, b't', 1, 0x1B, b'x', 1]
        );
        assert_eq!(out.final_y, 0.0);
    }
}

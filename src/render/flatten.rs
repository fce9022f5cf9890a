//! Flattening: turn a layout tree into a flat list of printable leaves.
//!
//! Relative offsets accumulate down the tree. Text is truncated here, once,
//! against whatever bounds it: the node's own width when it is
//! width-constrained, and the right edge of the enclosing grid cell.
//!
//! Grid cells arrive unshifted at the cell's left edge. Each cell is aligned
//! here as a whole: a text cell by its width after truncation, anything else
//! by its box width, with the shift carried down to its descendants.
//!
//! Vertical text becomes one item per glyph so that ordering by Y keeps the
//! paper moving forward even when other content shares its first line.

use std::borrow::Cow;

use serde::Serialize;

use super::RenderOptions;
use crate::font;
use crate::layout::{LayoutContent, LayoutResult, RenderConstraints};
use crate::style::{HAlign, Orientation, ResolvedStyle, TextOverflow};

const ELLIPSIS: &str = "...";
const EPSILON: f64 = 0.001;

/// A printable leaf at its final position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderItem {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: ResolvedStyle,
    pub payload: RenderPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RenderPayload {
    /// A run printed left to right. Vertical text yields one glyph per item.
    Text {
        content: String,
        orientation: Orientation,
    },
    Line {
        fill_char: char,
        length: f64,
    },
}

/// Edges and alignment of the grid cell enclosing a node, in render space.
#[derive(Debug, Clone, Copy)]
struct CellBound {
    left: f64,
    right: f64,
    h_align: HAlign,
}

impl CellBound {
    fn from_constraints(rc: &RenderConstraints, dx: f64) -> Self {
        CellBound {
            left: rc.boundary_x + dx,
            right: rc.boundary_x + rc.boundary_width + dx,
            h_align: rc.h_align,
        }
    }

    /// Shift that aligns content of `used` width starting at `x`. Content
    /// never starts left of the cell.
    fn align_shift(&self, x: f64, used: f64) -> f64 {
        let start = x.max(self.left);
        start - x + self.h_align.offset((self.right - start).max(0.0), used)
    }
}

/// Flatten a layout tree into render items, in tree order.
pub fn flatten(result: &LayoutResult, options: &RenderOptions) -> Vec<RenderItem> {
    let mut items = Vec::new();
    flatten_into(result, 0.0, 0.0, None, options, &mut items);
    items
}

fn flatten_into(
    result: &LayoutResult,
    dx: f64,
    dy: f64,
    enclosing: Option<CellBound>,
    options: &RenderOptions,
    out: &mut Vec<RenderItem>,
) {
    let (mut dx, dy) = match result.relative_offset {
        Some(offset) => (dx + offset.x, dy + offset.y),
        None => (dx, dy),
    };
    let own_cell = result
        .render_constraints
        .as_ref()
        .map(|rc| CellBound::from_constraints(rc, dx));
    let y = result.y + dy;

    match &result.content {
        LayoutContent::Text {
            content,
            orientation: Orientation::Horizontal,
            overflow,
            ..
        } => {
            let (x, content) =
                fit_text(result, content, *overflow, result.x + dx, own_cell, enclosing);
            if content.is_empty() {
                return;
            }
            out.push(RenderItem {
                x,
                y,
                width: font::text_width(&content, &result.style),
                height: result.height,
                style: result.style,
                payload: RenderPayload::Text {
                    content,
                    orientation: Orientation::Horizontal,
                },
            });
        }
        LayoutContent::Text {
            content,
            orientation: Orientation::Vertical,
            ..
        } => {
            // One glyph wide; nothing to truncate.
            let mut x = result.x + dx;
            if let Some(cell) = own_cell {
                x += cell.align_shift(x, font::widest_glyph(content, &result.style));
            }
            let step = options.line_height(&result.style);
            for (i, ch) in content.chars().enumerate() {
                if ch.is_control() {
                    continue;
                }
                out.push(RenderItem {
                    x,
                    y: y + step * i as f64,
                    width: font::char_width(ch, &result.style),
                    height: step,
                    style: result.style,
                    payload: RenderPayload::Text {
                        content: ch.to_string(),
                        orientation: Orientation::Vertical,
                    },
                });
            }
        }
        LayoutContent::Line { fill_char, length } => {
            if *length <= 0.0 {
                return;
            }
            let mut x = result.x + dx;
            if let Some(cell) = own_cell {
                x += cell.align_shift(x, *length);
            }
            out.push(RenderItem {
                x,
                y,
                width: *length,
                height: result.height,
                style: result.style,
                payload: RenderPayload::Line {
                    fill_char: *fill_char,
                    length: *length,
                },
            });
        }
        LayoutContent::Container => {
            if let Some(cell) = own_cell {
                dx += cell.align_shift(result.x + dx, result.width);
            }
            let bound = own_cell.or(enclosing);
            for child in &result.children {
                flatten_into(child, dx, dy, bound, options, out);
            }
        }
        LayoutContent::Spacer | LayoutContent::Empty => {}
    }
}

/// Truncate horizontal text against its bounds and, inside its own grid
/// cell, align it within the cell.
fn fit_text(
    result: &LayoutResult,
    content: &str,
    overflow: TextOverflow,
    x: f64,
    own_cell: Option<CellBound>,
    enclosing: Option<CellBound>,
) -> (f64, String) {
    let mut limit: Option<f64> = None;
    if result.width_constrained {
        limit = Some(result.width);
    }
    if let Some(cell) = own_cell.or(enclosing) {
        let room = (cell.right - x).max(0.0);
        limit = Some(limit.map_or(room, |l| l.min(room)));
    }

    let fitted = match limit {
        Some(max) => truncate_text(content, max, overflow, &result.style),
        None => Cow::Borrowed(content),
    };

    let x = match own_cell {
        Some(cell) => x + cell.align_shift(x, font::text_width(&fitted, &result.style)),
        None => x,
    };
    (x, fitted.into_owned())
}

/// Fit `text` into `max_width` dots according to `overflow`.
///
/// - `Visible` never truncates.
/// - `Clip` keeps the longest prefix whose width is at most `max_width`.
/// - `Ellipsis` keeps the longest prefix that still fits with `"..."`
///   appended. Text that already fits is returned unchanged; when not even
///   `"..."` fits, the result is empty.
pub fn truncate_text<'t>(
    text: &'t str,
    max_width: f64,
    overflow: TextOverflow,
    style: &ResolvedStyle,
) -> Cow<'t, str> {
    if overflow == TextOverflow::Visible || font::text_width(text, style) <= max_width + EPSILON
    {
        return Cow::Borrowed(text);
    }
    match overflow {
        TextOverflow::Visible => Cow::Borrowed(text),
        TextOverflow::Clip => Cow::Borrowed(longest_prefix(text, max_width, style)),
        TextOverflow::Ellipsis => {
            let suffix_width = font::text_width(ELLIPSIS, style);
            if suffix_width > max_width + EPSILON {
                return Cow::Borrowed("");
            }
            let prefix = longest_prefix(text, max_width - suffix_width, style);
            Cow::Owned(format!("{}{}", prefix.trim_end(), ELLIPSIS))
        }
    }
}

/// Longest prefix of `text` (on a char boundary) no wider than `max_width`.
fn longest_prefix<'t>(text: &'t str, max_width: f64, style: &ResolvedStyle) -> &'t str {
    let mut used = 0.0;
    for (i, ch) in text.char_indices() {
        used += font::char_width(ch, style);
        if used > max_width + EPSILON {
            return &text[..i];
        }
    }
    text
}

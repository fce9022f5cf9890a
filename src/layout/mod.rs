//! # Layout Engine
//!
//! The top-down pass. Every measured node receives a context (where it may
//! start, how much room it has) and returns a [`LayoutResult`] carrying
//! absolute, page-origin coordinates.
//!
//! ## Positioning
//!
//! Position is resolved once, before dispatching on the node kind:
//!
//! - `Flow` nodes are placed by their parent.
//! - `Absolute` nodes ignore the parent's cursor and are placed at
//!   `(pos_x ?? 0, pos_y ?? 0)` from the page origin. They never advance the
//!   parent's cursor, so flow siblings are laid out as if they did not exist.
//! - `Relative` nodes are laid out in flow; their offset is stored on the
//!   result and only applied when the tree is flattened for rendering.
//!
//! ## Grid cells
//!
//! Grid cells are never shifted horizontally here. The cell boundary and its
//! alignment go into [`RenderConstraints`] so the render pass can truncate and
//! align against the true cell edges, after it knows the truncated width.
//!
//! Layout never fails. Missing entries are skipped and alignment offsets are
//! clamped so content that overflows its container stays at the container's
//! origin instead of moving to negative coordinates.

pub mod flex;
pub mod grid;

use serde::Serialize;

use crate::measure::{MeasureExtras, MeasuredNode};
use crate::model::*;
use crate::style::*;

/// Where a node may be placed and how much room it has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The node sits inside a box of known width (a sized container, a flex
    /// slice or a grid cell). Text inside may be truncated to fit.
    pub constrained: bool,
    /// Horizontal alignment is deferred to the render pass.
    pub defer_align: bool,
}

impl LayoutContext {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            constrained: false,
            defer_align: false,
        }
    }

    fn slot(&self, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
            constrained: self.constrained,
            defer_align: false,
        }
    }
}

/// A positioned node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Page-origin X of the node's box (margins excluded).
    pub x: f64,
    /// Page-origin Y of the node's box.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: LayoutContent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutResult>,
    pub style: ResolvedStyle,
    /// Cell boundary for grid cells; alignment and truncation happen at render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_constraints: Option<RenderConstraints>,
    /// Visual shift applied at render time only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_offset: Option<Offset>,
    /// Text in this node may be truncated to `width`.
    pub width_constrained: bool,
}

/// What a result draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LayoutContent {
    Container,
    Text {
        content: String,
        orientation: Orientation,
        overflow: TextOverflow,
        #[serde(skip_serializing_if = "Option::is_none")]
        align: Option<HAlign>,
    },
    Line {
        fill_char: char,
        length: f64,
    },
    Spacer,
    /// A hidden node without a fallback.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConstraints {
    /// Left edge of the cell.
    pub boundary_x: f64,
    pub boundary_width: f64,
    pub boundary_height: f64,
    pub h_align: HAlign,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl LayoutResult {
    fn empty(x: f64, y: f64, style: ResolvedStyle) -> Self {
        LayoutResult {
            x,
            y,
            width: 0.0,
            height: 0.0,
            content: LayoutContent::Empty,
            children: vec![],
            style,
            render_constraints: None,
            relative_offset: None,
            width_constrained: false,
        }
    }
}

/// Lay out a measured node and its subtree.
pub fn layout(m: &MeasuredNode, ctx: &LayoutContext) -> LayoutResult {
    if !m.condition_met {
        return match &m.fallback {
            Some(fallback) => layout(fallback, ctx),
            None => LayoutResult::empty(ctx.x, ctx.y, m.style),
        };
    }

    let mut ctx = *ctx;
    let mut relative_offset = None;
    match m.node.style.position() {
        Position::Flow => {}
        Position::Absolute { pos_x, pos_y } => {
            ctx.x = pos_x.unwrap_or(0.0);
            ctx.y = pos_y.unwrap_or(0.0);
            // Out of flow: the parent's slot never shrinks the node.
            ctx.width = ctx.width.max(m.outer_width());
            ctx.height = ctx.height.max(m.outer_height());
        }
        Position::Relative { offset_x, offset_y } => {
            relative_offset = Some(Offset {
                x: offset_x.unwrap_or(0.0),
                y: offset_y.unwrap_or(0.0),
            });
        }
    }

    let mut result = place(m, &ctx);
    result.relative_offset = relative_offset;
    result
}

/// Resolve the node's own box, then lay out its content.
fn place(m: &MeasuredNode, ctx: &LayoutContext) -> LayoutResult {
    let margin = &m.margin;
    let available = (ctx.width - margin.horizontal()).max(0.0);

    let natural_width = match m.explicit_width {
        Some(w) => w,
        None if m.fills_width() || m.is_flex_spacer() => available,
        None => m.box_width(),
    };
    let width = natural_width.min(available).max(0.0);

    let height = match m.explicit_height {
        Some(h) => h,
        None if m.fills_height() => ctx.height - margin.vertical(),
        None => m.box_height(),
    }
    .max(0.0);

    // Grid cells are never shifted here; the render pass aligns them.
    let x = if margin.centers_horizontally() && !ctx.defer_align {
        ctx.x + HAlign::Center.offset(ctx.width, width)
    } else {
        let align = match &m.node.kind {
            NodeKind::Text {
                align: Some(align),
                ..
            } if !ctx.defer_align => align.offset(available, width),
            _ => 0.0,
        };
        ctx.x + margin.edges.left + align
    };
    let y = ctx.y + margin.edges.top;

    let inner = LayoutContext {
        x: x + m.padding.left,
        y: y + m.padding.top,
        width: (width - m.padding.horizontal()).max(0.0),
        height: (height - m.padding.vertical()).max(0.0),
        constrained: ctx.constrained || m.explicit_width.is_some() || m.fills_width(),
        defer_align: false,
    };

    let (content, children) = match &m.node.kind {
        NodeKind::Text {
            content,
            align,
            overflow,
            orientation,
        } => (
            LayoutContent::Text {
                content: content.clone(),
                orientation: *orientation,
                overflow: *overflow,
                align: *align,
            },
            vec![],
        ),
        NodeKind::Line { fill_char, .. } => (
            LayoutContent::Line {
                fill_char: *fill_char,
                length: inner.width,
            },
            vec![],
        ),
        NodeKind::Spacer { .. } => (LayoutContent::Spacer, vec![]),
        NodeKind::Stack {
            direction: StackDirection::Column,
            gap,
            align,
            ..
        } => (
            LayoutContent::Container,
            layout_column(&m.children, *gap, *align, &inner),
        ),
        NodeKind::Stack {
            direction: StackDirection::Row,
            gap,
            v_align,
            ..
        } => {
            let sized = m.explicit_height.is_some() || m.fills_height();
            (
                LayoutContent::Container,
                layout_row(&m.children, *gap, *v_align, sized, &inner),
            )
        }
        NodeKind::Flex {
            gap,
            row_gap,
            justify,
            align_items,
            wrap,
        } => {
            let lines = match &m.extras {
                MeasureExtras::Flex { lines } => lines.as_slice(),
                _ => &[][..],
            };
            let params = FlexParams {
                gap: *gap,
                row_gap: row_gap.unwrap_or(*gap),
                justify: *justify,
                align_items: *align_items,
                stretch_line: !*wrap && (m.explicit_height.is_some() || m.fills_height()),
            };
            (
                LayoutContent::Container,
                layout_flex(&m.children, lines, &params, &inner),
            )
        }
        NodeKind::Grid {
            column_gap,
            row_gap,
            cell_align,
            ..
        } => {
            let (columns, rows) = match &m.extras {
                MeasureExtras::Grid {
                    column_widths,
                    row_heights,
                } => (column_widths.as_slice(), row_heights.as_slice()),
                _ => (&[][..], &[][..]),
            };
            (
                LayoutContent::Container,
                layout_grid(
                    &m.children,
                    columns,
                    rows,
                    (*column_gap, *row_gap),
                    *cell_align,
                    &inner,
                ),
            )
        }
    };

    LayoutResult {
        x,
        y,
        width,
        height,
        content,
        children,
        style: m.style,
        render_constraints: None,
        relative_offset: None,
        width_constrained: ctx.constrained,
    }
}

/// Lay out children that sit outside the flow: absolutes, and hidden nodes
/// (which produce an empty result so the tree keeps its shape).
fn layout_out_of_flow(child: &MeasuredNode, inner: &LayoutContext) -> LayoutResult {
    layout(child, &inner.slot(inner.x, inner.y, inner.width, inner.height))
}

fn layout_column(
    children: &[MeasuredNode],
    gap: f64,
    align: HAlign,
    inner: &LayoutContext,
) -> Vec<LayoutResult> {
    let mut results = Vec::with_capacity(children.len());
    let mut cursor = inner.y;
    let mut first = true;

    for child in children {
        let Some(effective) = child.effective().filter(|_| child.occupies_flow()) else {
            results.push(layout_out_of_flow(child, inner));
            continue;
        };
        if !first {
            cursor += gap;
        }
        first = false;

        let self_aligned = matches!(
            effective.node.kind,
            NodeKind::Text {
                align: Some(_),
                ..
            }
        );
        let slot = if effective.margin.centers_horizontally()
            || self_aligned
            || align == HAlign::Left
        {
            inner.slot(inner.x, cursor, inner.width, child.outer_height())
        } else {
            let outer = child.outer_width().min(inner.width);
            let offset = align.offset(inner.width, outer);
            inner.slot(inner.x + offset, cursor, outer, child.outer_height())
        };

        results.push(layout(child, &slot));
        cursor += child.outer_height();
    }

    results
}

fn layout_row(
    children: &[MeasuredNode],
    gap: f64,
    v_align: VAlign,
    sized: bool,
    inner: &LayoutContext,
) -> Vec<LayoutResult> {
    let row_height = if sized {
        inner.height
    } else {
        children
            .iter()
            .filter(|c| c.occupies_flow())
            .map(|c| c.outer_height())
            .fold(0.0f64, f64::max)
    };

    let mut results = Vec::with_capacity(children.len());
    let mut cursor = inner.x;
    let mut first = true;

    for child in children {
        if !child.occupies_flow() {
            results.push(layout_out_of_flow(child, inner));
            continue;
        }
        if !first {
            cursor += gap;
        }
        first = false;

        let width = child.outer_width();
        let height = child.outer_height();
        let offset = v_align.offset(row_height, height);
        results.push(layout(
            child,
            &inner.slot(cursor, inner.y + offset, width, height),
        ));
        cursor += width;
    }

    results
}

struct FlexParams {
    gap: f64,
    row_gap: f64,
    justify: Justify,
    align_items: VAlign,
    /// A single line spanning the container's explicit height.
    stretch_line: bool,
}

fn layout_flex(
    children: &[MeasuredNode],
    lines: &[flex::FlexLine],
    params: &FlexParams,
    inner: &LayoutContext,
) -> Vec<LayoutResult> {
    let mut placed: Vec<Option<LayoutResult>> = vec![None; children.len()];
    let mut flow = Vec::with_capacity(children.len());
    for (i, child) in children.iter().enumerate() {
        if child.occupies_flow() {
            flow.push(i);
        } else {
            placed[i] = Some(layout_out_of_flow(child, inner));
        }
    }

    let mut line_y = inner.y;
    for (line_index, line) in lines.iter().enumerate() {
        if line_index > 0 {
            line_y += params.row_gap;
        }
        let Some(indices) = flow.get(line.start..line.end.min(flow.len())) else {
            continue;
        };

        let spacers = indices
            .iter()
            .filter(|&&i| children[i].is_flex_spacer())
            .count();
        let occupied: f64 = indices
            .iter()
            .filter(|&&i| !children[i].is_flex_spacer())
            .map(|&i| children[i].outer_width())
            .sum::<f64>()
            + flex::total_gap(indices.len(), params.gap);
        let share = flex::spacer_share(inner.width, occupied, spacers);
        // Spacers absorb all the slack; justification only sees what is left.
        let slack = if spacers > 0 {
            0.0
        } else {
            inner.width - line.width
        };
        let (start, between) = flex::justify_offsets(params.justify, slack, indices.len());

        let line_height = if params.stretch_line && lines.len() == 1 {
            inner.height.max(line.height)
        } else {
            line.height
        };

        let mut x = inner.x + start;
        for &i in indices {
            let child = &children[i];
            let width = if child.is_flex_spacer() {
                share
            } else {
                child.outer_width()
            };
            let height = child.outer_height();
            let offset = params.align_items.offset(line_height, height);
            let slot = LayoutContext {
                x,
                y: line_y + offset,
                width: width.max(0.0),
                height,
                constrained: true,
                defer_align: false,
            };
            placed[i] = Some(layout(child, &slot));
            x += width + params.gap + between;
        }

        line_y += line.height;
    }

    placed.into_iter().flatten().collect()
}

fn layout_grid(
    children: &[MeasuredNode],
    columns: &[f64],
    rows: &[f64],
    (column_gap, row_gap): (f64, f64),
    cell_align: HAlign,
    inner: &LayoutContext,
) -> Vec<LayoutResult> {
    let column_x = grid::track_offsets(columns, column_gap);
    let row_y = grid::track_offsets(rows, row_gap);
    let column_count = columns.len().max(1);

    let mut results = Vec::with_capacity(children.len());
    let mut cell = 0usize;

    for child in children {
        let Some(effective) = child.effective().filter(|_| child.occupies_flow()) else {
            results.push(layout_out_of_flow(child, inner));
            continue;
        };
        let (row, col) = grid::cell_position(cell, column_count);
        cell += 1;

        let (Some(&cx), Some(&cy), Some(&w), Some(&h)) = (
            column_x.get(col),
            row_y.get(row),
            columns.get(col),
            rows.get(row),
        ) else {
            continue;
        };

        let h_align = if effective.margin.centers_horizontally() {
            HAlign::Center
        } else {
            match effective.node.kind {
                NodeKind::Text {
                    align: Some(align),
                    ..
                } => align,
                _ => cell_align,
            }
        };

        let slot = LayoutContext {
            x: inner.x + cx,
            y: inner.y + cy,
            width: w,
            height: h,
            constrained: true,
            defer_align: true,
        };
        let mut result = layout(child, &slot);
        result.render_constraints = Some(RenderConstraints {
            boundary_x: slot.x,
            boundary_width: w,
            boundary_height: h,
            h_align,
        });
        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::measure::{measure, MeasureContext};

    fn run(node: &LayoutNode, width: f64) -> LayoutResult {
        let m = measure(node, &MeasureContext::new(width, 3960.0));
        layout(&m, &LayoutContext::new(0.0, 0.0, width, 3960.0))
    }

    fn text(s: &str) -> LayoutNode {
        LayoutNode::text(s, Style::default())
    }

    fn fill() -> Style {
        Style {
            width: Some(Dimension::Fill),
            ..Default::default()
        }
    }

    fn absolute(x: f64, y: f64) -> Style {
        Style {
            position: Some(Position::Absolute {
                pos_x: Some(x),
                pos_y: Some(y),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn column_stack_applies_gap() {
        let node = LayoutNode::column(20.0, Style::default(), vec![text("A"), text("B")]);
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].y, 0.0);
        assert_eq!(r.children[1].y, 80.0);
        assert_eq!(r.height, 140.0);
    }

    #[test]
    fn absolute_child_ignores_flow() {
        let node = LayoutNode::column(
            0.0,
            Style::default(),
            vec![
                text("FIRST"),
                LayoutNode::text("STAMP", absolute(100.0, 200.0)),
                text("SECOND"),
            ],
        );
        let r = run(&node, 1000.0);
        assert_eq!((r.children[1].x, r.children[1].y), (100.0, 200.0));
        assert_eq!(r.children[2].y, 60.0);
    }

    #[test]
    fn absolute_position_is_page_origin_not_parent() {
        let inner = LayoutNode::column(
            0.0,
            Style {
                padding: Some(Edges::uniform(50.0)),
                ..Default::default()
            },
            vec![LayoutNode::text("X", absolute(10.0, 20.0))],
        );
        let node = LayoutNode::column(0.0, Style::default(), vec![text("TOP"), inner]);
        let r = run(&node, 1000.0);
        let stamp = &r.children[1].children[0];
        assert_eq!((stamp.x, stamp.y), (10.0, 20.0));
    }

    #[test]
    fn absolute_missing_coordinates_default_to_zero() {
        let style = Style {
            position: Some(Position::Absolute {
                pos_x: Some(300.0),
                pos_y: None,
            }),
            ..Default::default()
        };
        let node = LayoutNode::column(
            0.0,
            Style::default(),
            vec![text("A"), LayoutNode::text("B", style)],
        );
        let r = run(&node, 1000.0);
        assert_eq!((r.children[1].x, r.children[1].y), (300.0, 0.0));
    }

    #[test]
    fn absolute_child_keeps_its_width_in_an_empty_parent() {
        let node = LayoutNode::column(
            0.0,
            Style::default(),
            vec![LayoutNode::text("STAMP", absolute(100.0, 0.0))],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.children[0].width, 180.0);
    }

    #[test]
    fn relative_offset_is_recorded_not_applied() {
        let style = Style {
            position: Some(Position::Relative {
                offset_x: Some(15.0),
                offset_y: Some(-5.0),
            }),
            ..Default::default()
        };
        let node = LayoutNode::column(
            0.0,
            Style::default(),
            vec![text("A"), LayoutNode::text("B", style), text("C")],
        );
        let r = run(&node, 1000.0);
        assert_eq!((r.children[1].x, r.children[1].y), (0.0, 60.0));
        assert_eq!(
            r.children[1].relative_offset,
            Some(Offset { x: 15.0, y: -5.0 })
        );
        assert_eq!(r.children[2].y, 120.0);
    }

    #[test]
    fn auto_margin_centers_text() {
        let node = LayoutNode::text(
            "INVOICE",
            Style {
                width: Some(Dimension::Dots(400.0)),
                margin: Some(MarginSpec::Auto),
                ..Default::default()
            },
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.x, 300.0);
        assert_eq!(r.width, 400.0);
    }

    #[test]
    fn auto_margin_wins_over_stack_alignment() {
        let mut node = LayoutNode::column(
            0.0,
            fill(),
            vec![LayoutNode::text(
                "A",
                Style {
                    width: Some(Dimension::Dots(200.0)),
                    margin: Some(MarginSpec::center_horizontally(0.0)),
                    ..Default::default()
                },
            )],
        );
        if let NodeKind::Stack { align, .. } = &mut node.kind {
            *align = HAlign::Right;
        }
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 400.0);
    }

    #[test]
    fn stack_alignment_uses_margin_box() {
        let mut node = LayoutNode::column(
            0.0,
            fill(),
            vec![LayoutNode::text(
                "A",
                Style {
                    width: Some(Dimension::Dots(100.0)),
                    margin: Some(MarginSpec::Uniform(10.0)),
                    ..Default::default()
                },
            )],
        );
        if let NodeKind::Stack { align, .. } = &mut node.kind {
            *align = HAlign::Right;
        }
        let r = run(&node, 1000.0);
        // Margin box is 120 wide, placed at 880; the box starts after its left margin.
        assert_eq!(r.children[0].x, 890.0);
        assert_eq!(r.children[0].y, 10.0);
    }

    #[test]
    fn text_with_own_align_aligns_itself() {
        let mut child = text("AB");
        if let NodeKind::Text { align, .. } = &mut child.kind {
            *align = Some(HAlign::Right);
        }
        let node = LayoutNode::column(0.0, fill(), vec![child]);
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 928.0);
    }

    #[test]
    fn text_width_clamped_to_available() {
        let node = LayoutNode::column(
            0.0,
            Style {
                width: Some(Dimension::Dots(100.0)),
                ..Default::default()
            },
            vec![text("TOO WIDE FOR THE BOX")],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].width, 100.0);
        assert!(r.children[0].width_constrained);
    }

    #[test]
    fn row_stack_valign() {
        let mut node = LayoutNode::row(
            10.0,
            Style::default(),
            vec![
                text("A"),
                LayoutNode::text(
                    "B",
                    Style {
                        double_height: Some(true),
                        ..Default::default()
                    },
                ),
            ],
        );
        if let NodeKind::Stack { v_align, .. } = &mut node.kind {
            *v_align = VAlign::Bottom;
        }
        let r = run(&node, 1000.0);
        assert_eq!((r.children[0].x, r.children[0].y), (0.0, 60.0));
        assert_eq!((r.children[1].x, r.children[1].y), (46.0, 0.0));
    }

    #[test]
    fn flex_align_items_center() {
        let mut node = LayoutNode::flex(
            Justify::Start,
            Style {
                height: Some(Dimension::Dots(200.0)),
                ..Default::default()
            },
            vec![text("A")],
        );
        if let NodeKind::Flex { align_items, .. } = &mut node.kind {
            *align_items = VAlign::Center;
        }
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].y, 70.0);
    }

    #[test]
    fn flex_spacer_pushes_to_right_edge() {
        let node = LayoutNode::flex(
            Justify::Start,
            fill(),
            vec![
                text("QTY"),
                LayoutNode::spacer(true, Style::default()),
                text("12.50"),
            ],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[1].width, 1000.0 - 108.0 - 180.0);
        assert_eq!(r.children[2].x, 820.0);
    }

    #[test]
    fn flex_justify_space_between() {
        let node = LayoutNode::flex(
            Justify::SpaceBetween,
            fill(),
            vec![text("A"), text("B"), text("C")],
        );
        let r = run(&node, 1000.0);
        let xs: Vec<f64> = r.children.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0.0, 482.0, 964.0]);
    }

    #[test]
    fn flex_justify_end_overflow_clamps() {
        let node = LayoutNode::flex(
            Justify::End,
            Style {
                width: Some(Dimension::Dots(50.0)),
                ..Default::default()
            },
            vec![text("ABC")],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 0.0);
    }

    #[test]
    fn flex_wrap_moves_to_next_line() {
        let item = Style {
            width: Some(Dimension::Dots(100.0)),
            ..Default::default()
        };
        let mut node = LayoutNode::flex(
            Justify::Center,
            Style {
                width: Some(Dimension::Dots(250.0)),
                ..Default::default()
            },
            vec![
                LayoutNode::text("A", item.clone()),
                LayoutNode::text("B", item.clone()),
                LayoutNode::text("C", item),
            ],
        );
        if let NodeKind::Flex {
            gap, row_gap, wrap, ..
        } = &mut node.kind
        {
            *gap = 10.0;
            *row_gap = Some(20.0);
            *wrap = true;
        }
        let r = run(&node, 1000.0);
        // Line 1 packs 210 of 250: centered with 20 on each side.
        assert_eq!((r.children[0].x, r.children[0].y), (20.0, 0.0));
        assert_eq!(r.children[1].x, 130.0);
        // Line 2 packs 100: centered at 75.
        assert_eq!((r.children[2].x, r.children[2].y), (75.0, 80.0));
    }

    #[test]
    fn flex_children_are_width_constrained() {
        let node = LayoutNode::flex(Justify::Start, Style::default(), vec![text("A")]);
        let r = run(&node, 1000.0);
        assert!(!r.width_constrained);
        assert!(r.children[0].width_constrained);
    }

    #[test]
    fn grid_cells_at_prefix_sums() {
        let node = LayoutNode::grid(
            vec![TrackSize::Dots(100.0), TrackSize::Dots(200.0)],
            Style::default(),
            vec![text("A"), text("B")],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 0.0);
        assert_eq!(r.children[1].x, 100.0);
        let rc = r.children[1].render_constraints.expect("cell constraints");
        assert_eq!(rc.boundary_width, 200.0);
        assert_eq!(rc.boundary_x, 100.0);
    }

    #[test]
    fn grid_defers_alignment_to_render() {
        let mut cell = text("AB");
        if let NodeKind::Text { align, .. } = &mut cell.kind {
            *align = Some(HAlign::Right);
        }
        let node = LayoutNode::grid(
            vec![TrackSize::Dots(300.0)],
            Style::default(),
            vec![cell],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 0.0);
        assert_eq!(
            r.children[0].render_constraints.map(|c| c.h_align),
            Some(HAlign::Right)
        );
    }

    #[test]
    fn grid_auto_margin_cell_is_not_centered_in_layout() {
        let cell = LayoutNode::text(
            "A",
            Style {
                margin: Some(MarginSpec::Auto),
                ..Default::default()
            },
        );
        let node = LayoutNode::grid(vec![TrackSize::Dots(300.0)], Style::default(), vec![cell]);
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 0.0);
        assert_eq!(
            r.children[0].render_constraints.map(|c| c.h_align),
            Some(HAlign::Center)
        );
    }

    #[test]
    fn explicit_width_text_in_auto_stack_is_unconstrained() {
        let node = LayoutNode::column(
            0.0,
            Style::default(),
            vec![LayoutNode::text(
                "ABCDEFGH",
                Style {
                    width: Some(Dimension::Dots(100.0)),
                    ..Default::default()
                },
            )],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].width, 100.0);
        assert!(!r.children[0].width_constrained);
    }

    #[test]
    fn grid_rows_and_gaps() {
        let mut node = LayoutNode::grid(
            vec![TrackSize::Fill, TrackSize::Fill],
            Style::default(),
            vec![text("A"), text("B"), text("C")],
        );
        if let NodeKind::Grid {
            column_gap,
            row_gap,
            ..
        } = &mut node.kind
        {
            *column_gap = 20.0;
            *row_gap = 10.0;
        }
        let r = run(&node, 1020.0);
        assert_eq!((r.children[1].x, r.children[1].y), (520.0, 0.0));
        assert_eq!((r.children[2].x, r.children[2].y), (0.0, 70.0));
    }

    #[test]
    fn hidden_child_renders_fallback_in_place() {
        let node = LayoutNode::column(
            0.0,
            Style::default(),
            vec![
                text("A"),
                text("HIDDEN").visible_when(Condition::Never, Some(text("SHOWN"))),
                text("C"),
            ],
        );
        let r = run(&node, 1000.0);
        match &r.children[1].content {
            LayoutContent::Text { content, .. } => assert_eq!(content, "SHOWN"),
            other => panic!("expected fallback text, got {:?}", other),
        }
        assert_eq!(r.children[2].y, 120.0);
    }

    #[test]
    fn hidden_child_without_fallback_is_empty() {
        let node = LayoutNode::column(
            20.0,
            Style::default(),
            vec![
                text("A"),
                text("HIDDEN").visible_when(Condition::Never, None),
                text("C"),
            ],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[1].content, LayoutContent::Empty);
        assert_eq!(r.children[2].y, 80.0);
    }

    #[test]
    fn line_spans_content_width() {
        let node = LayoutNode::column(
            0.0,
            Style {
                padding: Some(Edges::symmetric(0.0, 40.0)),
                ..Default::default()
            },
            vec![LayoutNode::line(None, '=', Style::default())],
        );
        let r = run(&node, 1000.0);
        assert_eq!(r.children[0].x, 40.0);
        assert_eq!(
            r.children[0].content,
            LayoutContent::Line {
                fill_char: '=',
                length: 920.0
            }
        );
    }

    #[test]
    fn layout_result_serializes() {
        let node = LayoutNode::column(0.0, Style::default(), vec![text("A")]);
        let json = serde_json::to_value(run(&node, 1000.0)).unwrap();
        assert_eq!(json["children"][0]["content"]["type"], "text");
        assert_eq!(json["children"][0]["content"]["content"], "A");
    }
}

//! # Measure Engine
//!
//! The bottom-up pass. Every node reports an intrinsic content size and a
//! preferred size (content + padding + margin, clamped to its min/max
//! bounds). Containers measure their children first and combine the results
//! according to their kind.
//!
//! Measurement is pure: the input tree is borrowed, never modified, and the
//! same input always produces the same [`MeasuredNode`] tree. Unresolvable
//! specs fall back to `Auto`, and zero or negative available space produces
//! zero-clamped sizes rather than errors.

use serde::Serialize;
use serde_json::Value;

use crate::font;
use crate::layout::flex::{self, FlexLine};
use crate::layout::grid;
use crate::model::*;
use crate::style::*;

/// One line at 6 LPI, the power-on default of every ESC/P printer.
pub const DEFAULT_LINE_SPACING: f64 = 60.0;

static NO_DATA: Value = Value::Null;

/// Everything a node needs to know about its surroundings to size itself.
#[derive(Debug, Clone, Copy)]
pub struct MeasureContext<'d> {
    pub available_width: f64,
    pub available_height: f64,
    /// Height of one text line in dots.
    pub line_spacing: f64,
    /// Extra dots reserved after every printable glyph.
    pub inter_char_space: f64,
    pub inherited_style: ResolvedStyle,
    /// Data context for visibility predicates.
    pub data: &'d Value,
}

impl MeasureContext<'static> {
    pub fn new(available_width: f64, available_height: f64) -> Self {
        Self {
            available_width,
            available_height,
            line_spacing: DEFAULT_LINE_SPACING,
            inter_char_space: 0.0,
            inherited_style: ResolvedStyle::default(),
            data: &NO_DATA,
        }
    }
}

impl<'d> MeasureContext<'d> {
    /// Attach a data context for visibility predicates.
    pub fn with_data<'e>(self, data: &'e Value) -> MeasureContext<'e> {
        MeasureContext {
            available_width: self.available_width,
            available_height: self.available_height,
            line_spacing: self.line_spacing,
            inter_char_space: self.inter_char_space,
            inherited_style: self.inherited_style,
            data,
        }
    }

    fn nested(&self, available_width: f64, available_height: f64, style: ResolvedStyle) -> Self {
        Self {
            available_width: available_width.max(0.0),
            available_height: available_height.max(0.0),
            inherited_style: style,
            ..*self
        }
    }

    /// Height of one line of text in the given style.
    fn line_height(&self, style: &ResolvedStyle) -> f64 {
        let ls = self.line_spacing.max(0.0);
        if style.double_height {
            ls * 2.0
        } else {
            ls
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-kind results the layout engine reuses instead of recomputing.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureExtras {
    None,
    Flex {
        lines: Vec<FlexLine>,
    },
    Grid {
        column_widths: Vec<f64>,
        row_heights: Vec<f64>,
    },
}

/// A node plus everything the measure pass learned about it.
#[derive(Debug, Clone)]
pub struct MeasuredNode<'a> {
    pub node: &'a LayoutNode,
    pub padding: Edges,
    pub margin: ResolvedMargin,
    pub style: ResolvedStyle,
    /// Intrinsic content size, excluding padding and margin.
    pub min_content: Size,
    /// Content + padding + margin, clamped to min/max and floored at 0.
    pub preferred: Size,
    /// Box width when the width spec resolved to a concrete number.
    pub explicit_width: Option<f64>,
    /// Box height when the height spec resolved to a concrete number.
    pub explicit_height: Option<f64>,
    pub children: Vec<MeasuredNode<'a>>,
    pub extras: MeasureExtras,
    /// False when the visibility predicate failed or could not be resolved.
    pub condition_met: bool,
    pub fallback: Option<Box<MeasuredNode<'a>>>,
}

impl<'a> MeasuredNode<'a> {
    /// The node that actually renders: itself, or its fallback when hidden.
    pub fn effective(&self) -> Option<&MeasuredNode<'a>> {
        if self.condition_met {
            Some(self)
        } else {
            self.fallback.as_deref().and_then(|f| f.effective())
        }
    }

    pub fn position(&self) -> Position {
        self.effective()
            .map(|m| m.node.style.position())
            .unwrap_or_default()
    }

    /// Does this node take part in its parent's flow?
    pub fn occupies_flow(&self) -> bool {
        self.effective().is_some() && !self.position().is_absolute()
    }

    /// Width of the margin-box. An explicit width always gets its margins added.
    pub fn outer_width(&self) -> f64 {
        match self.explicit_width {
            Some(w) => w + self.margin.horizontal(),
            None => self.preferred.width,
        }
    }

    /// Height of the margin-box.
    pub fn outer_height(&self) -> f64 {
        match self.explicit_height {
            Some(h) => h + self.margin.vertical(),
            None => self.preferred.height,
        }
    }

    /// Width of the box itself (content + padding).
    pub fn box_width(&self) -> f64 {
        self.explicit_width
            .unwrap_or(self.preferred.width - self.margin.horizontal())
            .max(0.0)
    }

    /// Height of the box itself (content + padding).
    pub fn box_height(&self) -> f64 {
        self.explicit_height
            .unwrap_or(self.preferred.height - self.margin.vertical())
            .max(0.0)
    }

    pub fn is_flex_spacer(&self) -> bool {
        self.effective().is_some_and(|m| m.node.is_flex_spacer())
    }

    /// Does the width spec ask for all available space?
    pub fn fills_width(&self) -> bool {
        matches!(self.node.style.width, Some(Dimension::Fill))
    }

    pub fn fills_height(&self) -> bool {
        matches!(self.node.style.height, Some(Dimension::Fill))
    }

    fn hidden(
        node: &'a LayoutNode,
        style: ResolvedStyle,
        fallback: Option<Box<MeasuredNode<'a>>>,
    ) -> Self {
        let preferred = fallback
            .as_ref()
            .map(|f| Size::new(f.outer_width(), f.outer_height()))
            .unwrap_or_default();
        MeasuredNode {
            node,
            padding: Edges::default(),
            margin: ResolvedMargin::default(),
            style,
            min_content: Size::default(),
            preferred,
            explicit_width: None,
            explicit_height: None,
            children: vec![],
            extras: MeasureExtras::None,
            condition_met: false,
            fallback,
        }
    }
}

/// What a kind-specific measurement produces.
struct Content<'a> {
    size: Size,
    children: Vec<MeasuredNode<'a>>,
    extras: MeasureExtras,
}

impl<'a> Content<'a> {
    fn leaf(width: f64, height: f64) -> Self {
        Content {
            size: Size::new(width.max(0.0), height.max(0.0)),
            children: vec![],
            extras: MeasureExtras::None,
        }
    }
}

/// Measure a node and its subtree.
pub fn measure<'a>(node: &'a LayoutNode, ctx: &MeasureContext) -> MeasuredNode<'a> {
    let style = node.style.resolve(&ctx.inherited_style);

    if let Some(visibility) = &node.visibility {
        if !visibility.when.holds(ctx.data) {
            let fallback = visibility
                .fallback
                .as_deref()
                .map(|f| Box::new(measure(f, ctx)));
            return MeasuredNode::hidden(node, style, fallback);
        }
    }

    let padding = resolve_padding(node.style.padding.as_ref());
    let margin = resolve_margin(node.style.margin.as_ref());
    let bounds = node.style.bounds(ctx.available_width, ctx.available_height);

    let explicit_width = node
        .style
        .width
        .and_then(|d| d.resolve(ctx.available_width))
        .map(|w| bounds.clamp_width(w));
    let explicit_height = node
        .style
        .height
        .and_then(|d| d.resolve(ctx.available_height))
        .map(|h| bounds.clamp_height(h));

    // Content box offered to children.
    let inner_width = match explicit_width {
        Some(w) => w - padding.horizontal(),
        None => ctx.available_width - margin.horizontal() - padding.horizontal(),
    }
    .max(0.0);
    let inner_height = match explicit_height {
        Some(h) => h - padding.vertical(),
        None => ctx.available_height - margin.vertical() - padding.vertical(),
    }
    .max(0.0);
    let child_ctx = ctx.nested(inner_width, inner_height, style);

    let content = match &node.kind {
        NodeKind::Text {
            content,
            orientation,
            ..
        } => measure_text(content, *orientation, &style, ctx),
        NodeKind::Spacer { .. } => Content::leaf(0.0, ctx.line_spacing),
        NodeKind::Line { length, .. } => {
            let width = length.filter(|l| l.is_finite()).unwrap_or(inner_width);
            Content::leaf(width, ctx.line_height(&style))
        }
        NodeKind::Stack { direction, gap, .. } => match direction {
            StackDirection::Column => measure_column(&node.children, *gap, &child_ctx),
            StackDirection::Row => measure_row(&node.children, *gap, &child_ctx),
        },
        NodeKind::Flex {
            gap, row_gap, wrap, ..
        } => measure_flex(
            &node.children,
            *gap,
            row_gap.unwrap_or(*gap),
            *wrap,
            &child_ctx,
        ),
        NodeKind::Grid {
            columns,
            rows,
            column_gap,
            row_gap,
            ..
        } => measure_grid(&node.children, columns, rows, *column_gap, *row_gap, &child_ctx),
    };

    let preferred_width = match (node.style.width, explicit_width) {
        (Some(Dimension::Fill), _) => ctx.available_width,
        (_, Some(w)) => w,
        _ => content.size.width + padding.horizontal() + margin.horizontal(),
    };
    let preferred_height = match (node.style.height, explicit_height) {
        (Some(Dimension::Fill), _) => ctx.available_height,
        (_, Some(h)) => h,
        _ => content.size.height + padding.vertical() + margin.vertical(),
    };

    MeasuredNode {
        node,
        padding,
        margin,
        style,
        min_content: content.size,
        preferred: Size::new(
            bounds.clamp_width(preferred_width),
            bounds.clamp_height(preferred_height),
        ),
        explicit_width,
        explicit_height,
        children: content.children,
        extras: content.extras,
        condition_met: true,
        fallback: None,
    }
}

fn measure_text<'a>(
    content: &str,
    orientation: Orientation,
    style: &ResolvedStyle,
    ctx: &MeasureContext,
) -> Content<'a> {
    let line_height = ctx.line_height(style);
    match orientation {
        Orientation::Horizontal => {
            let printable = content.chars().filter(|c| !c.is_control()).count();
            let width =
                font::text_width(content, style) + ctx.inter_char_space * printable as f64;
            Content::leaf(width, line_height)
        }
        Orientation::Vertical => {
            let count = content.chars().count();
            Content::leaf(
                font::widest_glyph(content, style),
                line_height * count as f64,
            )
        }
    }
}

fn measure_all<'a>(children: &'a [LayoutNode], ctx: &MeasureContext) -> Vec<MeasuredNode<'a>> {
    children.iter().map(|child| measure(child, ctx)).collect()
}

fn measure_column<'a>(children: &'a [LayoutNode], gap: f64, ctx: &MeasureContext) -> Content<'a> {
    let measured = measure_all(children, ctx);
    let flow: Vec<&MeasuredNode> = measured.iter().filter(|m| m.occupies_flow()).collect();

    let width = flow
        .iter()
        .map(|m| m.outer_width())
        .fold(0.0f64, f64::max);
    let height =
        flow.iter().map(|m| m.outer_height()).sum::<f64>() + flex::total_gap(flow.len(), gap);

    Content {
        size: Size::new(width, height),
        children: measured,
        extras: MeasureExtras::None,
    }
}

fn measure_row<'a>(children: &'a [LayoutNode], gap: f64, ctx: &MeasureContext) -> Content<'a> {
    let mut measured = measure_all(children, ctx);

    // Fill-width children share whatever the fixed children leave over.
    let flow_count = measured.iter().filter(|m| m.occupies_flow()).count();
    let fill_count = measured
        .iter()
        .filter(|m| m.occupies_flow() && m.fills_width())
        .count();
    if fill_count > 0 {
        let fixed: f64 = measured
            .iter()
            .filter(|m| m.occupies_flow() && !m.fills_width())
            .map(|m| m.outer_width())
            .sum();
        let share = flex::spacer_share(
            ctx.available_width,
            fixed + flex::total_gap(flow_count, gap),
            fill_count,
        );
        let share_ctx = MeasureContext {
            available_width: share,
            ..*ctx
        };
        for (child, m) in children.iter().zip(measured.iter_mut()) {
            if m.occupies_flow() && m.fills_width() {
                *m = measure(child, &share_ctx);
            }
        }
    }

    let flow: Vec<&MeasuredNode> = measured.iter().filter(|m| m.occupies_flow()).collect();
    let width =
        flow.iter().map(|m| m.outer_width()).sum::<f64>() + flex::total_gap(flow.len(), gap);
    let height = flow
        .iter()
        .map(|m| m.outer_height())
        .fold(0.0f64, f64::max);

    Content {
        size: Size::new(width, height),
        children: measured,
        extras: MeasureExtras::None,
    }
}

/// `(occupied width, occupied height)` of a flex item. Flex spacers occupy no
/// width until layout hands them the slack.
fn flex_item_size(m: &MeasuredNode) -> (f64, f64) {
    if m.is_flex_spacer() {
        (0.0, m.outer_height())
    } else {
        (m.outer_width(), m.outer_height())
    }
}

fn measure_flex<'a>(
    children: &'a [LayoutNode],
    gap: f64,
    row_gap: f64,
    wrap: bool,
    ctx: &MeasureContext,
) -> Content<'a> {
    let measured = measure_all(children, ctx);
    let items: Vec<(f64, f64)> = measured
        .iter()
        .filter(|m| m.occupies_flow())
        .map(flex_item_size)
        .collect();

    let lines = if wrap {
        flex::partition_into_lines(&items, gap, ctx.available_width)
    } else if items.is_empty() {
        vec![]
    } else {
        vec![flex::single_line(&items, gap)]
    };

    let width = lines.iter().map(|l| l.width).fold(0.0f64, f64::max);
    let height =
        lines.iter().map(|l| l.height).sum::<f64>() + flex::total_gap(lines.len(), row_gap);

    Content {
        size: Size::new(width, height),
        children: measured,
        extras: MeasureExtras::Flex { lines },
    }
}

fn measure_grid<'a>(
    children: &'a [LayoutNode],
    template: &[TrackSize],
    row_overrides: &[Option<f64>],
    column_gap: f64,
    row_gap: f64,
    ctx: &MeasureContext,
) -> Content<'a> {
    let columns = grid::column_count(template);
    let content_width = ctx.available_width;

    // Pass 1: measure every cell against its provisional column width and
    // track the widest cell per column.
    let mut minimums = vec![0.0f64; columns];
    let mut measured: Vec<MeasuredNode<'a>> = Vec::with_capacity(children.len());
    let mut cell = 0usize;
    for child in children {
        if !takes_flow(child, ctx.data) {
            measured.push(measure(child, ctx));
            continue;
        }
        let (_, col) = grid::cell_position(cell, columns);
        let cell_ctx = MeasureContext {
            available_width: provisional(template, col, content_width),
            ..*ctx
        };
        let m = measure(child, &cell_ctx);
        minimums[col] = minimums[col].max(m.outer_width());
        measured.push(m);
        cell += 1;
    }

    // Pass 2: resolve columns.
    let column_widths = grid::resolve_columns(template, content_width, column_gap, &minimums);

    // Re-measure cells whose final column changes their size, then size rows.
    // A cell that already fills its final width exactly measures the same.
    let rows = grid::row_count(cell, columns);
    let mut row_heights = vec![ctx.line_spacing.max(0.0); rows];
    let mut cell = 0usize;
    for (child, m) in children.iter().zip(measured.iter_mut()) {
        if !m.occupies_flow() {
            continue;
        }
        let (row, col) = grid::cell_position(cell, columns);
        let width = column_widths[col];
        if differs(width, provisional(template, col, content_width))
            && differs(width, m.outer_width())
        {
            let cell_ctx = MeasureContext {
                available_width: width,
                ..*ctx
            };
            *m = measure(child, &cell_ctx);
        }
        row_heights[row] = row_heights[row].max(m.outer_height());
        cell += 1;
    }
    for (row, height) in row_heights.iter_mut().enumerate() {
        if let Some(Some(h)) = row_overrides.get(row) {
            *height = h.max(0.0);
        }
    }

    let size = Size::new(
        grid::total_extent(&column_widths, column_gap),
        grid::total_extent(&row_heights, row_gap),
    );

    Content {
        size,
        children: measured,
        extras: MeasureExtras::Grid {
            column_widths,
            row_heights,
        },
    }
}

fn provisional(template: &[TrackSize], col: usize, content_width: f64) -> f64 {
    grid::provisional_width(grid::track(template, col), content_width)
}

fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() > 0.001
}

/// Whether a node will occupy a flow slot, decided without measuring it.
/// Agrees with [`MeasuredNode::occupies_flow`].
fn takes_flow(node: &LayoutNode, data: &Value) -> bool {
    match &node.visibility {
        Some(visibility) if !visibility.when.holds(data) => visibility
            .fallback
            .as_deref()
            .is_some_and(|fallback| takes_flow(fallback, data)),
        _ => !node.style.position().is_absolute(),
    }
}

//! # Document Model
//!
//! The input representation for the engine. A document is a tree of
//! [`LayoutNode`]s, each with a kind, a declared style and children. Trees
//! are built once upstream (a builder API, a JSX layer, or JSON) and are
//! never mutated by the pipeline.
//!
//! All lengths are in dots: 1/360 inch, the native addressing unit of the
//! printers we target.

use crate::condition::Condition;
use crate::render::RenderOptions;
use crate::style::*;
use serde::{Deserialize, Serialize};

/// A complete document ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The root of the layout tree.
    pub root: LayoutNode,

    /// Printable page rectangle.
    #[serde(default)]
    pub page: PageConfig,

    /// Command emission settings.
    #[serde(default)]
    pub options: RenderOptions,

    /// Data context for visibility predicates.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The page rectangle that layout places content into.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Paper size. Defaults to 8" continuous fanfold.
    #[serde(default)]
    pub size: PageSize,

    /// Unprintable margins in dots.
    #[serde(default)]
    pub margin: Edges,
}

impl PageConfig {
    /// Content rectangle `(x, y, width, height)` inside the page margins.
    pub fn content_rect(&self) -> (f64, f64, f64, f64) {
        let (w, h) = self.size.dimensions();
        (
            self.margin.left,
            self.margin.top,
            (w - self.margin.horizontal()).max(0.0),
            (h - self.margin.vertical()).max(0.0),
        )
    }
}

/// Standard paper sizes, in dots.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// 8" × 11" continuous fanfold, 80 pica columns.
    #[default]
    Fanfold,
    /// 13.6" × 11" wide-carriage fanfold, 136 pica columns.
    WideFanfold,
    Letter,
    A4,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in dots.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::Fanfold => (2880.0, 3960.0),
            PageSize::WideFanfold => (4896.0, 3960.0),
            PageSize::Letter => (3060.0, 3960.0),
            PageSize::A4 => (2976.0, 4209.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for padding and page margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// One side of a margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeValue {
    Dots(f64),
    Auto,
}

/// A margin: one number, `Auto` on every side, or per-side values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarginSpec {
    Uniform(f64),
    Auto,
    Sides {
        #[serde(default = "zero_edge")]
        top: EdgeValue,
        #[serde(default = "zero_edge")]
        right: EdgeValue,
        #[serde(default = "zero_edge")]
        bottom: EdgeValue,
        #[serde(default = "zero_edge")]
        left: EdgeValue,
    },
}

fn zero_edge() -> EdgeValue {
    EdgeValue::Dots(0.0)
}

impl MarginSpec {
    /// Auto left and right, numeric top and bottom.
    pub fn center_horizontally(vertical: f64) -> Self {
        MarginSpec::Sides {
            top: EdgeValue::Dots(vertical),
            right: EdgeValue::Auto,
            bottom: EdgeValue::Dots(vertical),
            left: EdgeValue::Auto,
        }
    }
}

/// Positioning mode for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum Position {
    /// Sequential placement by the parent.
    #[default]
    Flow,
    /// Page-origin coordinates; removed from the parent's flow.
    Absolute {
        #[serde(default)]
        pos_x: Option<f64>,
        #[serde(default)]
        pos_y: Option<f64>,
    },
    /// Flow placement, shifted visually at render time only.
    Relative {
        #[serde(default)]
        offset_x: Option<f64>,
        #[serde(default)]
        offset_y: Option<f64>,
    },
}

impl Position {
    pub fn is_absolute(&self) -> bool {
        matches!(self, Position::Absolute { .. })
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Box model, positioning and print-style overrides.
    #[serde(default)]
    pub style: Style,

    /// Child nodes. Only containers lay out children.
    #[serde(default)]
    pub children: Vec<LayoutNode>,

    /// A unique identifier for this node (optional, useful for debugging).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Render this node only when the condition holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// A visibility predicate plus what to render instead when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub when: Condition,
    #[serde(default)]
    pub fallback: Option<Box<LayoutNode>>,
}

/// The different kinds of nodes in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    /// Sequential column or row of children.
    Stack {
        #[serde(default)]
        direction: StackDirection,
        #[serde(default)]
        gap: f64,
        /// Horizontal alignment of children in a column.
        #[serde(default)]
        align: HAlign,
        /// Vertical alignment of children in a row.
        #[serde(default)]
        v_align: VAlign,
    },

    /// A horizontal flex row with justification and optional wrapping.
    Flex {
        #[serde(default)]
        gap: f64,
        /// Gap between wrapped lines. Defaults to `gap`.
        #[serde(default)]
        row_gap: Option<f64>,
        #[serde(default)]
        justify: Justify,
        #[serde(default)]
        align_items: VAlign,
        #[serde(default)]
        wrap: bool,
    },

    /// A grid. Children fill cells row-major, `columns.len()` per row.
    Grid {
        columns: Vec<TrackSize>,
        /// Per-row height overrides; `None` keeps the measured height.
        #[serde(default)]
        rows: Vec<Option<f64>>,
        #[serde(default)]
        column_gap: f64,
        #[serde(default)]
        row_gap: f64,
        /// Default horizontal alignment inside each cell.
        #[serde(default)]
        cell_align: HAlign,
    },

    /// A single line of text. Never wraps.
    Text {
        content: String,
        #[serde(default)]
        align: Option<HAlign>,
        #[serde(default)]
        overflow: TextOverflow,
        #[serde(default)]
        orientation: Orientation,
    },

    /// Empty space. A flex spacer absorbs the slack of a flex row.
    Spacer {
        #[serde(default)]
        flex: bool,
    },

    /// A horizontal rule drawn with a repeated fill character.
    Line {
        /// Length in dots. `None` fills the available width.
        #[serde(default)]
        length: Option<f64>,
        #[serde(default = "default_fill_char")]
        fill_char: char,
    },
}

fn default_fill_char() -> char {
    '-'
}

/// Column width definition for grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackSize {
    /// Fixed width in dots.
    Dots(f64),
    /// Percentage of the grid's content width.
    Percent(f64),
    /// Widest cell in the column.
    Auto,
    /// Even share of the remaining width, never below the widest cell.
    Fill,
}

impl LayoutNode {
    fn with_kind(kind: NodeKind, style: Style, children: Vec<LayoutNode>) -> Self {
        Self {
            kind,
            style,
            children,
            id: None,
            visibility: None,
        }
    }

    /// Create a column stack.
    pub fn column(gap: f64, style: Style, children: Vec<LayoutNode>) -> Self {
        Self::with_kind(
            NodeKind::Stack {
                direction: StackDirection::Column,
                gap,
                align: HAlign::Left,
                v_align: VAlign::Top,
            },
            style,
            children,
        )
    }

    /// Create a row stack.
    pub fn row(gap: f64, style: Style, children: Vec<LayoutNode>) -> Self {
        Self::with_kind(
            NodeKind::Stack {
                direction: StackDirection::Row,
                gap,
                align: HAlign::Left,
                v_align: VAlign::Top,
            },
            style,
            children,
        )
    }

    /// Create a non-wrapping flex row.
    pub fn flex(justify: Justify, style: Style, children: Vec<LayoutNode>) -> Self {
        Self::with_kind(
            NodeKind::Flex {
                gap: 0.0,
                row_gap: None,
                justify,
                align_items: VAlign::Top,
                wrap: false,
            },
            style,
            children,
        )
    }

    /// Create a grid with the given columns.
    pub fn grid(columns: Vec<TrackSize>, style: Style, children: Vec<LayoutNode>) -> Self {
        Self::with_kind(
            NodeKind::Grid {
                columns,
                rows: vec![],
                column_gap: 0.0,
                row_gap: 0.0,
                cell_align: HAlign::Left,
            },
            style,
            children,
        )
    }

    /// Create a Text node.
    pub fn text(content: &str, style: Style) -> Self {
        Self::with_kind(
            NodeKind::Text {
                content: content.to_string(),
                align: None,
                overflow: TextOverflow::default(),
                orientation: Orientation::Horizontal,
            },
            style,
            vec![],
        )
    }

    /// Create a spacer.
    pub fn spacer(flex: bool, style: Style) -> Self {
        Self::with_kind(NodeKind::Spacer { flex }, style, vec![])
    }

    /// Create a line. `None` fills the available width.
    pub fn line(length: Option<f64>, fill_char: char, style: Style) -> Self {
        Self::with_kind(NodeKind::Line { length, fill_char }, style, vec![])
    }

    /// Attach a visibility predicate.
    pub fn visible_when(mut self, when: Condition, fallback: Option<LayoutNode>) -> Self {
        self.visibility = Some(Visibility {
            when,
            fallback: fallback.map(Box::new),
        });
        self
    }

    /// Is this node a container that lays out its children?
    pub fn is_container(&self) -> bool {
        match &self.kind {
            NodeKind::Stack { .. } | NodeKind::Flex { .. } | NodeKind::Grid { .. } => true,
            NodeKind::Text { .. } | NodeKind::Spacer { .. } | NodeKind::Line { .. } => false,
        }
    }

    /// Is this a spacer that absorbs flex slack?
    pub fn is_flex_spacer(&self) -> bool {
        matches!(self.kind, NodeKind::Spacer { flex: true })
    }
}

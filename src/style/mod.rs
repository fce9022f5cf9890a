//! # Style System
//!
//! Two concerns live here. The first is the box model: width/height specs,
//! min/max bounds, padding and margins (with per-side `Auto`). The second is
//! the print style: the small register set a dot-matrix printer actually has
//! (bold, italic, underline, double-strike, double-width, double-height,
//! condensed, pitch, typeface, print quality).
//!
//! Print style cascades down the tree. Every node can override any field;
//! anything it leaves unset is inherited from the parent's resolved style.
//! The cascade is a fold over explicit arguments, never global state.

use crate::model::{Edges, EdgeValue, MarginSpec, Position};
use serde::{Deserialize, Serialize};

/// The declared style of a node: box model, positioning and print overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // ── Box Model ──────────────────────────────────────────────
    /// Width spec. Unset means `Auto`.
    pub width: Option<Dimension>,
    /// Height spec. Unset means `Auto`.
    pub height: Option<Dimension>,
    pub min_width: Option<Dimension>,
    pub min_height: Option<Dimension>,
    pub max_width: Option<Dimension>,
    pub max_height: Option<Dimension>,

    /// Padding inside the node's box, in dots.
    #[serde(default)]
    pub padding: Option<Edges>,
    /// Margin outside the node's box. Sides may be `Auto`.
    #[serde(default)]
    pub margin: Option<MarginSpec>,

    // ── Positioning ────────────────────────────────────────────
    /// Flow (default), absolute or relative placement.
    pub position: Option<Position>,

    // ── Print Style ────────────────────────────────────────────
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub double_strike: Option<bool>,
    pub double_width: Option<bool>,
    pub double_height: Option<bool>,
    pub condensed: Option<bool>,
    /// Characters per inch: 10, 12, 15, or the condensed aliases 17 and 20.
    pub cpi: Option<u32>,
    /// Printer typeface index (ESC k n).
    pub typeface: Option<u8>,
    pub print_quality: Option<PrintQuality>,
}

/// A size specification in dots (1/360 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// Fixed size in dots.
    Dots(f64),
    /// Percentage of the available size along the same axis.
    Percent(f64),
    /// Size determined by content.
    Auto,
    /// Take all available space.
    Fill,
}

impl Dimension {
    /// Resolve this dimension against an available size.
    /// Returns `None` for `Auto` and `Fill`, which callers handle themselves.
    pub fn resolve(&self, available: f64) -> Option<f64> {
        match self {
            Dimension::Dots(v) if v.is_finite() => Some(*v),
            Dimension::Percent(p) if p.is_finite() => Some(available.max(0.0) * p / 100.0),
            _ => None,
        }
    }

    /// Resolve a dimension used as a min/max bound. Unknown values yield `None`.
    fn resolve_bound(dim: Option<Dimension>, available: f64) -> Option<f64> {
        dim.and_then(|d| d.resolve(available))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintQuality {
    #[default]
    Draft,
    /// Letter quality (NLQ/LQ depending on the printer).
    Lq,
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    /// Offset that places `used` inside `available`. Never negative.
    pub fn offset(self, available: f64, used: f64) -> f64 {
        let slack = (available - used).max(0.0);
        match self {
            HAlign::Left => 0.0,
            HAlign::Center => (slack / 2.0).floor(),
            HAlign::Right => slack,
        }
    }
}

/// Vertical alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VAlign {
    /// Offset that places `used` inside `available`. Never negative.
    pub fn offset(self, available: f64, used: f64) -> f64 {
        let slack = (available - used).max(0.0);
        match self {
            VAlign::Top => 0.0,
            VAlign::Center => (slack / 2.0).floor(),
            VAlign::Bottom => slack,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackDirection {
    #[default]
    Column,
    Row,
}

/// How a flex container distributes slack along the main axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justify {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// What happens to text wider than its constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextOverflow {
    /// Never truncate.
    Visible,
    /// Cut at the last character that fits.
    #[default]
    Clip,
    /// Cut and append `"..."`.
    Ellipsis,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    /// One character per line, top to bottom.
    Vertical,
}

/// Fully resolved print style. This is also the printer's register state
/// tracked by the render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolvedStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub double_strike: bool,
    pub double_width: bool,
    pub double_height: bool,
    pub condensed: bool,
    pub cpi: u32,
    pub typeface: u8,
    pub print_quality: PrintQuality,
}

impl Default for ResolvedStyle {
    /// Printer state right after `ESC @`.
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            double_strike: false,
            double_width: false,
            double_height: false,
            condensed: false,
            cpi: 10,
            typeface: 0,
            print_quality: PrintQuality::Draft,
        }
    }
}

impl Style {
    /// Resolve print style against the parent's resolved style.
    pub fn resolve(&self, parent: &ResolvedStyle) -> ResolvedStyle {
        ResolvedStyle {
            bold: self.bold.unwrap_or(parent.bold),
            italic: self.italic.unwrap_or(parent.italic),
            underline: self.underline.unwrap_or(parent.underline),
            double_strike: self.double_strike.unwrap_or(parent.double_strike),
            double_width: self.double_width.unwrap_or(parent.double_width),
            double_height: self.double_height.unwrap_or(parent.double_height),
            condensed: self.condensed.unwrap_or(parent.condensed),
            cpi: self.cpi.unwrap_or(parent.cpi),
            typeface: self.typeface.unwrap_or(parent.typeface),
            print_quality: self.print_quality.unwrap_or(parent.print_quality),
        }
    }

    /// Resolve the min/max bounds of both axes against available space.
    pub fn bounds(&self, available_width: f64, available_height: f64) -> SizeBounds {
        let min_width = Dimension::resolve_bound(self.min_width, available_width)
            .unwrap_or(0.0)
            .max(0.0);
        let min_height = Dimension::resolve_bound(self.min_height, available_height)
            .unwrap_or(0.0)
            .max(0.0);
        SizeBounds {
            min_width,
            min_height,
            max_width: Dimension::resolve_bound(self.max_width, available_width)
                .unwrap_or(f64::INFINITY)
                .max(min_width),
            max_height: Dimension::resolve_bound(self.max_height, available_height)
                .unwrap_or(f64::INFINITY)
                .max(min_height),
        }
    }

    pub fn position(&self) -> Position {
        self.position.unwrap_or_default()
    }
}

/// Resolved min/max bounds for a node. Max is never below min.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl SizeBounds {
    pub fn clamp_width(&self, w: f64) -> f64 {
        clamp_size(w, self.min_width, self.max_width)
    }

    pub fn clamp_height(&self, h: f64) -> f64 {
        clamp_size(h, self.min_height, self.max_height)
    }
}

/// Clamp into [min, max], then floor at zero. NaN collapses to the minimum.
pub fn clamp_size(value: f64, min: f64, max: f64) -> f64 {
    let v = if value.is_nan() { min } else { value };
    v.max(min).min(max).max(0.0)
}

/// Margins after resolution: `Auto` sides become 0 and are flagged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMargin {
    pub edges: Edges,
    pub auto_top: bool,
    pub auto_right: bool,
    pub auto_bottom: bool,
    pub auto_left: bool,
}

impl ResolvedMargin {
    /// Both horizontal sides are auto: the node centers itself.
    pub fn centers_horizontally(&self) -> bool {
        self.auto_left && self.auto_right
    }

    pub fn horizontal(&self) -> f64 {
        self.edges.horizontal()
    }

    pub fn vertical(&self) -> f64 {
        self.edges.vertical()
    }
}

/// Resolve a padding spec. Negative or non-finite sides clamp to zero.
pub fn resolve_padding(padding: Option<&Edges>) -> Edges {
    let p = padding.copied().unwrap_or_default();
    Edges {
        top: non_negative(p.top),
        right: non_negative(p.right),
        bottom: non_negative(p.bottom),
        left: non_negative(p.left),
    }
}

/// Resolve a margin spec into concrete edges plus auto flags.
pub fn resolve_margin(margin: Option<&MarginSpec>) -> ResolvedMargin {
    let (top, right, bottom, left) = match margin {
        None => return ResolvedMargin::default(),
        Some(MarginSpec::Uniform(v)) => {
            let side = EdgeValue::Dots(*v);
            (side, side, side, side)
        }
        Some(MarginSpec::Auto) => (
            EdgeValue::Auto,
            EdgeValue::Auto,
            EdgeValue::Auto,
            EdgeValue::Auto,
        ),
        Some(MarginSpec::Sides {
            top,
            right,
            bottom,
            left,
        }) => (*top, *right, *bottom, *left),
    };

    fn side(v: EdgeValue) -> (f64, bool) {
        match v {
            EdgeValue::Dots(d) => (non_negative(d), false),
            EdgeValue::Auto => (0.0, true),
        }
    }

    let (t, auto_top) = side(top);
    let (r, auto_right) = side(right);
    let (b, auto_bottom) = side(bottom);
    let (l, auto_left) = side(left);

    ResolvedMargin {
        edges: Edges {
            top: t,
            right: r,
            bottom: b,
            left: l,
        },
        auto_top,
        auto_right,
        auto_bottom,
        auto_left,
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

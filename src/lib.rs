//! # Platen
//!
//! A layout compiler for dot-matrix printers.
//!
//! Receipts, invoices, labels and continuous-form reports are still printed
//! on impact printers, and those printers do not take PDFs. They take a
//! stream of ESC/P commands: move the paper down, move the head across, turn
//! bold on, print these bytes. Platen lets you describe the page as a tree of
//! stacks, flex rows, grids and text, and compiles it into that stream.
//!
//! The printer imposes two constraints the whole engine is built around:
//!
//! - **Fixed pitch.** Every glyph at a given pitch is the same width, so text
//!   measurement is exact and layout can be computed up front in dots
//!   (1/360 inch).
//! - **Paper only moves forward.** The command stream must visit content top
//!   to bottom. Layout can place content anywhere, so the render pass sorts
//!   everything by position before emitting a single byte.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    Document tree and visibility predicates
//!       ↓
//!   [measure]  Bottom-up intrinsic sizes, style cascade
//!       ↓
//!   [layout]   Top-down absolute placement: stacks, flex, grid
//!       ↓
//!   [render]   Flatten, truncate, sort, emit
//!       ↓
//!   [escp]     Command bytes
//! ```

pub mod condition;
pub mod error;
pub mod escp;
pub mod font;
pub mod layout;
pub mod measure;
pub mod model;
pub mod render;
pub mod style;

#[cfg(feature = "wasm")]
pub mod wasm;

use error::PlatenError;
use layout::{LayoutContext, LayoutResult};
use measure::MeasureContext;
use model::Document;
use render::RenderOutput;

/// Measure and lay out a document inside its page's content rectangle.
pub fn layout_document(document: &Document) -> LayoutResult {
    let (x, y, width, height) = document.page.content_rect();
    let options = &document.options;
    let ctx = MeasureContext {
        available_width: width,
        available_height: height,
        line_spacing: options.line_spacing,
        inter_char_space: options.inter_char_space,
        inherited_style: options.initial_style,
        data: &document.data,
    };
    let measured = measure::measure(&document.root, &ctx);
    layout::layout(&measured, &LayoutContext::new(x, y, width, height))
}

/// Render a document to ESC/P command bytes.
///
/// This is the primary entry point. Fails only in strict mode, when content
/// would require moving the paper backward.
pub fn render(document: &Document) -> Result<RenderOutput, PlatenError> {
    let result = layout_document(document);
    render::render(&result, &document.options)
}

/// Render a document described as JSON to ESC/P command bytes.
pub fn render_json(json: &str) -> Result<RenderOutput, PlatenError> {
    let document: Document = serde_json::from_str(json)?;
    render(&document)
}

/// Lay out a JSON document and return the layout tree as JSON, for
/// inspection tooling.
pub fn layout_json(json: &str) -> Result<String, PlatenError> {
    let document: Document = serde_json::from_str(json)?;
    let result = layout_document(&document);
    Ok(serde_json::to_string_pretty(&result)?)
}

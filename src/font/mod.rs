//! # Glyph Metrics
//!
//! Dot-matrix printers use fixed-pitch typefaces: every printable glyph
//! advances the head by the same amount, set by the active pitch and the
//! condensed and double-width registers. There is nothing to load or parse;
//! the pitch table below is the entire font model.

use crate::style::ResolvedStyle;

/// Native resolution in dots per inch.
pub const DOTS_PER_INCH: f64 = 360.0;

/// The three physical pitch commands a printer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    /// 10 CPI.
    Pica,
    /// 12 CPI.
    Elite,
    /// 15 CPI.
    Micron,
}

impl Pitch {
    /// Map a CPI value to a physical pitch and an implied condensed flag.
    /// 17 and 20 CPI are condensed pica and condensed elite.
    pub fn from_cpi(cpi: u32) -> Option<(Pitch, bool)> {
        match cpi {
            10 => Some((Pitch::Pica, false)),
            12 => Some((Pitch::Elite, false)),
            15 => Some((Pitch::Micron, false)),
            17 => Some((Pitch::Pica, true)),
            20 => Some((Pitch::Elite, true)),
            _ => None,
        }
    }

    /// Glyph advance in dots, before double-width.
    pub fn advance(self, condensed: bool) -> f64 {
        match (self, condensed) {
            (Pitch::Pica, false) => 36.0,
            (Pitch::Pica, true) => 21.0,
            (Pitch::Elite, false) => 30.0,
            (Pitch::Elite, true) => 18.0,
            (Pitch::Micron, _) => 24.0,
        }
    }
}

/// Physical pitch and condensed state for a style. Unknown CPI falls back to
/// pica; the render context is responsible for warning about it.
pub fn physical_pitch(style: &ResolvedStyle) -> (Pitch, bool) {
    let (pitch, implied) = Pitch::from_cpi(style.cpi).unwrap_or((Pitch::Pica, false));
    (pitch, implied || style.condensed)
}

/// Advance of one printable glyph in dots.
pub fn glyph_advance(style: &ResolvedStyle) -> f64 {
    let (pitch, condensed) = physical_pitch(style);
    let base = pitch.advance(condensed);
    if style.double_width {
        base * 2.0
    } else {
        base
    }
}

/// Advance of a single character. Control characters do not move the head.
pub fn char_width(ch: char, style: &ResolvedStyle) -> f64 {
    if ch.is_control() {
        0.0
    } else {
        glyph_advance(style)
    }
}

/// Width of a string printed horizontally.
pub fn text_width(text: &str, style: &ResolvedStyle) -> f64 {
    text.chars().map(|ch| char_width(ch, style)).sum()
}

/// Width of the widest glyph in a string (vertical text column width).
pub fn widest_glyph(text: &str, style: &ResolvedStyle) -> f64 {
    text.chars()
        .map(|ch| char_width(ch, style))
        .fold(0.0f64, f64::max)
}

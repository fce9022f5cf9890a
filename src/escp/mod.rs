//! # ESC/P Command Codec
//!
//! The command vocabulary the render engine speaks, and its byte encoding for
//! Epson ESC/P and ESC/P2 printers (and the many 9/24-pin clones that follow
//! them).
//!
//! ## Units
//!
//! - Layout works in dots, 1/360 inch.
//! - Vertical advance (`ESC J n`) is in 1/180 inch: one unit is two dots.
//!   `n` is a single byte, so longer moves are chained.
//! - Absolute horizontal position (`ESC $ nL nH`) is in 1/60 inch: one unit is
//!   six dots.
//!
//! ## Usage
//!
//! ```
//! use platen::escp::{self, Command};
//!
//! let mut out = Vec::new();
//! Command::Initialize.encode(&mut out);
//! Command::Bold(true).encode(&mut out);
//! for cmd in escp::advance_vertical(300) {
//!     cmd.encode(&mut out);
//! }
//! assert_eq!(&out[..4], &[0x1B, b'@', 0x1B, b'E']);
//! ```

pub mod charset;

pub use charset::{CharTable, Charset};

use crate::font::Pitch;
use crate::style::PrintQuality;

pub const ESC: u8 = 0x1B;
/// Shift In: condensed on.
pub const SI: u8 = 0x0F;
/// Device Control 2: condensed off.
pub const DC2: u8 = 0x12;

/// Largest `n` a single `ESC J n` accepts.
pub const MAX_VERTICAL_STEP: u8 = 255;

/// Dots per `ESC J` unit (1/180").
pub const DOTS_PER_VERTICAL_UNIT: f64 = 2.0;
/// Dots per `ESC $` unit (1/60").
pub const DOTS_PER_HORIZONTAL_UNIT: f64 = 6.0;

/// One printer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ESC @`: reset to power-on state.
    Initialize,
    SelectPitch(Pitch),
    Bold(bool),
    Italic(bool),
    DoubleStrike(bool),
    Underline(bool),
    Condensed(bool),
    DoubleWidth(bool),
    DoubleHeight(bool),
    Typeface(u8),
    PrintQuality(PrintQuality),
    /// Advance the paper by `n`/180 inch.
    AdvanceVertical(u8),
    /// Move the head to `n`/60 inch from the left margin.
    SetAbsoluteX(u16),
    SelectCharset(Charset),
    SelectCharTable(CharTable),
    /// Already-encoded glyph bytes.
    Text(Vec<u8>),
}

impl Command {
    /// Append this command's bytes to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Command::Initialize => out.extend_from_slice(&[ESC, b'@']),
            Command::SelectPitch(pitch) => {
                let code = match pitch {
                    Pitch::Pica => b'P',
                    Pitch::Elite => b'M',
                    Pitch::Micron => b'g',
                };
                out.extend_from_slice(&[ESC, code]);
            }
            Command::Bold(on) => out.extend_from_slice(&[ESC, if *on { b'E' } else { b'F' }]),
            Command::Italic(on) => out.extend_from_slice(&[ESC, if *on { b'4' } else { b'5' }]),
            Command::DoubleStrike(on) => {
                out.extend_from_slice(&[ESC, if *on { b'G' } else { b'H' }])
            }
            Command::Underline(on) => out.extend_from_slice(&[ESC, b'-', u8::from(*on)]),
            Command::Condensed(on) => out.push(if *on { SI } else { DC2 }),
            Command::DoubleWidth(on) => out.extend_from_slice(&[ESC, b'W', u8::from(*on)]),
            Command::DoubleHeight(on) => out.extend_from_slice(&[ESC, b'w', u8::from(*on)]),
            Command::Typeface(n) => out.extend_from_slice(&[ESC, b'k', *n]),
            Command::PrintQuality(q) => {
                let n = match q {
                    PrintQuality::Draft => 0,
                    PrintQuality::Lq => 1,
                };
                out.extend_from_slice(&[ESC, b'x', n]);
            }
            Command::AdvanceVertical(n) => out.extend_from_slice(&[ESC, b'J', *n]),
            Command::SetAbsoluteX(n) => {
                let [lo, hi] = n.to_le_bytes();
                out.extend_from_slice(&[ESC, b'$', lo, hi]);
            }
            Command::SelectCharset(charset) => out.extend_from_slice(&[ESC, b'R', charset.code()]),
            Command::SelectCharTable(table) => table.encode_select(out),
            Command::Text(bytes) => out.extend_from_slice(bytes),
        }
    }

    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

/// Commands that advance the paper by `units`/180 inch, chained in steps of
/// at most 255. Zero units produces no commands.
pub fn advance_vertical(units: u32) -> Vec<Command> {
    let step = u32::from(MAX_VERTICAL_STEP);
    let mut remaining = units;
    let mut commands = Vec::with_capacity((units / step + 1) as usize);
    while remaining > 0 {
        let n = remaining.min(step);
        // n <= 255 by construction.
        commands.push(Command::AdvanceVertical(n as u8));
        remaining -= n;
    }
    commands
}

/// Horizontal position in `ESC $` units for a dot coordinate, saturating at
/// the command's range.
pub fn horizontal_units(x: f64) -> u16 {
    let units = (x.max(0.0) / DOTS_PER_HORIZONTAL_UNIT).round();
    if units >= f64::from(u16::MAX) {
        u16::MAX
    } else {
        units as u16
    }
}

/// Vertical position in `ESC J` units for a dot coordinate.
pub fn vertical_units(y: f64) -> i64 {
    (y / DOTS_PER_VERTICAL_UNIT).round() as i64
}

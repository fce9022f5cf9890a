//! International character sets (`ESC R n`) and character tables (`ESC t n`).
//!
//! The international set swaps a dozen ASCII positions (`#`, `$`, `@`, `[`
//! ...) for national glyphs. The character table decides what the upper half
//! (0x80-0xFF) prints. Text is encoded against the table; characters the
//! table cannot print become `?`.

use serde::{Deserialize, Serialize};

use super::ESC;

/// International character set selected with `ESC R n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    Usa,
    France,
    Germany,
    UnitedKingdom,
    DenmarkI,
    Sweden,
    Italy,
    SpainI,
    Japan,
    Norway,
    DenmarkII,
    SpainII,
    LatinAmerica,
    Korea,
    Legal,
}

impl Charset {
    /// The `n` in `ESC R n`.
    pub fn code(self) -> u8 {
        match self {
            Charset::Usa => 0,
            Charset::France => 1,
            Charset::Germany => 2,
            Charset::UnitedKingdom => 3,
            Charset::DenmarkI => 4,
            Charset::Sweden => 5,
            Charset::Italy => 6,
            Charset::SpainI => 7,
            Charset::Japan => 8,
            Charset::Norway => 9,
            Charset::DenmarkII => 10,
            Charset::SpainII => 11,
            Charset::LatinAmerica => 12,
            Charset::Korea => 13,
            Charset::Legal => 64,
        }
    }
}

/// Character table for the upper half of the code space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharTable {
    /// Italic ASCII in the upper half. Only ASCII is printable.
    Italic,
    /// PC437 graphics: accented letters, box drawing, shading.
    #[default]
    Pc437,
    /// ISO 8859-1, assigned to table 3 (ESC/P2 only).
    Latin1,
}

/// PC437 glyphs for 0x80-0xFF.
const PC437_UPPER: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{A0}',
];

const REPLACEMENT: u8 = b'?';

impl CharTable {
    /// Append the bytes that select this table.
    pub fn encode_select(self, out: &mut Vec<u8>) {
        match self {
            CharTable::Italic => out.extend_from_slice(&[ESC, b't', 0]),
            CharTable::Pc437 => out.extend_from_slice(&[ESC, b't', 1]),
            CharTable::Latin1 => {
                // ESC ( t: assign ISO 8859-1 (29, 16) to table 3, then select it.
                out.extend_from_slice(&[ESC, b'(', b't', 3, 0, 3, 29, 16]);
                out.extend_from_slice(&[ESC, b't', 3]);
            }
        }
    }

    /// Encode one character, or `None` when the table cannot print it.
    pub fn encode_char(self, ch: char) -> Option<u8> {
        if (' '..='~').contains(&ch) {
            return Some(ch as u8);
        }
        match self {
            CharTable::Italic => None,
            CharTable::Pc437 => PC437_UPPER
                .iter()
                .position(|&c| c == ch)
                .map(|i| 0x80 + i as u8),
            CharTable::Latin1 => {
                let code = ch as u32;
                if (0xA0..=0xFF).contains(&code) {
                    Some(code as u8)
                } else {
                    None
                }
            }
        }
    }

    /// Encode a string. Control characters are dropped and unprintable
    /// characters become `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        text.chars()
            .filter(|c| !c.is_control())
            .map(|c| self.encode_char(c).unwrap_or(REPLACEMENT))
            .collect()
    }
}

//! The device state machine.
//!
//! [`RenderContext`] tracks where the print head is and which style registers
//! are set, and emits only the commands needed to move from the current state
//! to the one each item requires. Paper only moves forward: a target above
//! the current line is either skipped with a warning or, in strict mode,
//! reported as an error.

use log::{debug, warn};

use super::flatten::{RenderItem, RenderPayload};
use super::RenderOptions;
use crate::error::PlatenError;
use crate::escp::{self, Command};
use crate::font::{self, Pitch};
use crate::style::ResolvedStyle;

/// Fallback pitch for unsupported CPI values.
const DEFAULT_CPI: u32 = 10;

/// Head moves of at most this many dots are not worth a command.
const X_TOLERANCE: f64 = 1.0;

pub struct RenderContext<'o> {
    options: &'o RenderOptions,
    out: Vec<u8>,
    current_x: f64,
    current_y: f64,
    /// Style the printer currently has set.
    style: ResolvedStyle,
    cpi_warned: bool,
    commands: usize,
}

impl<'o> RenderContext<'o> {
    pub fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            out: Vec::new(),
            current_x: options.start_x,
            current_y: options.start_y,
            style: ResolvedStyle::default(),
            cpi_warned: false,
            commands: 0,
        }
    }

    pub fn current_x(&self) -> f64 {
        self.current_x
    }

    pub fn current_y(&self) -> f64 {
        self.current_y
    }

    fn emit(&mut self, command: Command) {
        command.encode(&mut self.out);
        self.commands += 1;
    }

    /// Reset the device, select the character set and table, and seed the
    /// initial style.
    pub fn begin(&mut self) {
        if self.options.initialize {
            self.emit(Command::Initialize);
        }
        self.emit(Command::SelectCharset(self.options.charset));
        self.emit(Command::SelectCharTable(self.options.char_table));
        let initial = self.options.initial_style;
        self.apply_style(&initial);
    }

    /// Valid CPI for a style, warning once per render about anything else.
    fn normalize(&mut self, style: &ResolvedStyle) -> ResolvedStyle {
        if Pitch::from_cpi(style.cpi).is_some() {
            return *style;
        }
        if !self.cpi_warned {
            warn!(
                "Unsupported CPI {}; using {} CPI (supported: 10, 12, 15, 17, 20)",
                style.cpi, DEFAULT_CPI
            );
            self.cpi_warned = true;
        }
        ResolvedStyle {
            cpi: DEFAULT_CPI,
            ..*style
        }
    }

    /// Emit the commands that turn the current style into `target`.
    pub fn apply_style(&mut self, target: &ResolvedStyle) {
        let target = self.normalize(target);
        let current = self.style;

        let (pitch, condensed) = font::physical_pitch(&target);
        let (current_pitch, current_condensed) = font::physical_pitch(&current);
        if pitch != current_pitch {
            self.emit(Command::SelectPitch(pitch));
        }
        if condensed != current_condensed {
            self.emit(Command::Condensed(condensed));
        }
        if target.bold != current.bold {
            self.emit(Command::Bold(target.bold));
        }
        if target.italic != current.italic {
            self.emit(Command::Italic(target.italic));
        }
        if target.underline != current.underline {
            self.emit(Command::Underline(target.underline));
        }
        if target.double_strike != current.double_strike {
            self.emit(Command::DoubleStrike(target.double_strike));
        }
        if target.double_width != current.double_width {
            self.emit(Command::DoubleWidth(target.double_width));
        }
        if target.double_height != current.double_height {
            self.emit(Command::DoubleHeight(target.double_height));
        }
        if target.typeface != current.typeface {
            self.emit(Command::Typeface(target.typeface));
        }
        if target.print_quality != current.print_quality {
            self.emit(Command::PrintQuality(target.print_quality));
        }

        self.style = target;
    }

    /// Advance the paper to `target`. Backward targets are skipped with a
    /// warning, or rejected in strict mode.
    pub fn move_to_y(&mut self, target: f64) -> Result<(), PlatenError> {
        if target < self.current_y {
            if self.options.strict_mode {
                return Err(PlatenError::BackwardMovement {
                    from: self.current_y,
                    to: target,
                });
            }
            warn!(
                "Skipping backward paper movement from y={} to y={}",
                self.current_y, target
            );
            return Ok(());
        }

        let units = escp::vertical_units(target) - escp::vertical_units(self.current_y);
        if units > 0 {
            let units = u32::try_from(units).unwrap_or(u32::MAX);
            for command in escp::advance_vertical(units) {
                self.emit(command);
            }
        }
        self.current_y = target;
        Ok(())
    }

    /// Move the head to `target` unless it is already within a dot of it.
    pub fn move_to_x(&mut self, target: f64) {
        if (target - self.current_x).abs() <= X_TOLERANCE {
            return;
        }
        self.emit(Command::SetAbsoluteX(escp::horizontal_units(target)));
        self.current_x = target;
    }

    fn print(&mut self, text: &str, style: &ResolvedStyle) {
        let bytes = self.options.char_table.encode(text);
        if bytes.is_empty() {
            return;
        }
        self.emit(Command::Text(bytes));
        self.current_x += font::text_width(text, style);
    }

    /// Emit one render item.
    pub fn emit_item(&mut self, item: &RenderItem) -> Result<(), PlatenError> {
        let style = self.normalize(&item.style);
        match &item.payload {
            RenderPayload::Text { content, .. } => {
                self.move_to_y(item.y)?;
                self.move_to_x(item.x);
                self.apply_style(&style);
                self.print(content, &style);
            }
            RenderPayload::Line { fill_char, length } => {
                self.move_to_y(item.y)?;
                self.move_to_x(item.x);
                self.apply_style(&style);
                let glyph = font::glyph_advance(&style);
                let count = ((length / glyph).ceil() as usize).max(1);
                let rule: String = std::iter::repeat(*fill_char).take(count).collect();
                self.print(&rule, &style);
            }
        }
        Ok(())
    }

    /// Finish the pass and hand back the command stream.
    pub fn finish(self) -> (Vec<u8>, f64) {
        debug!(
            "Emitted {} commands ({} bytes), final y={}",
            self.commands,
            self.out.len(),
            self.current_y
        );
        (self.out, self.current_y)
    }
}

#![forbid(unsafe_code)]

//! Terminal presenter.
//!
//! Diffs consecutive frames and queues crossterm commands for the changed
//! cells only, batching cursor moves within runs and re-emitting colors only
//! when they change. The presenter owns no terminal state beyond the last
//! presented buffer; raw mode and screen setup belong to the app's session.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};

use crate::buffer::Buffer;
use crate::cell::{Cell, CellAttrs, Rgba};

fn term_color(color: Rgba) -> Color {
    if color.is_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    }
}

/// Writes buffer diffs as escape sequences.
pub struct Presenter<W: Write> {
    out: W,
    last: Option<Buffer>,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Forget the last frame; the next present redraws everything.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Present a frame, emitting only cells that changed since the last one.
    pub fn present(&mut self, buf: &Buffer) -> io::Result<()> {
        let changed: Vec<(u16, u16)> = match &self.last {
            Some(prev) => buf.diff(prev),
            None => buf.diff(&Buffer::new(0, 0)),
        };
        if changed.is_empty() {
            return Ok(());
        }

        let mut cursor: Option<(u16, u16)> = None;
        let mut fg: Option<Rgba> = None;
        let mut bg: Option<Rgba> = None;
        let mut attrs = CellAttrs::empty();

        for (x, y) in changed {
            let cell = *buf.get(x, y).unwrap_or(&Cell::default());

            if cursor != Some((x, y)) {
                queue!(self.out, MoveTo(x, y))?;
            }

            if cell.attrs != attrs {
                queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
                if cell.attrs.contains(CellAttrs::BOLD) {
                    queue!(self.out, SetAttribute(Attribute::Bold))?;
                }
                if cell.attrs.contains(CellAttrs::DIM) {
                    queue!(self.out, SetAttribute(Attribute::Dim))?;
                }
                if cell.attrs.contains(CellAttrs::UNDERLINE) {
                    queue!(self.out, SetAttribute(Attribute::Underlined))?;
                }
                attrs = cell.attrs;
                fg = None;
                bg = None;
            }
            if fg != Some(cell.fg) {
                queue!(self.out, SetForegroundColor(term_color(cell.fg)))?;
                fg = Some(cell.fg);
            }
            if bg != Some(cell.bg) {
                queue!(self.out, SetBackgroundColor(term_color(cell.bg)))?;
                bg = Some(cell.bg);
            }

            queue!(self.out, Print(cell.ch))?;
            cursor = Some((x + 1, y));
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        self.out.flush()?;
        self.last = Some(buf.clone());
        Ok(())
    }
}

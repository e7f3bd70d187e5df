#![forbid(unsafe_code)]

//! The cell grid render target.
//!
//! Components draw into a [`Buffer`]; the presenter diffs consecutive
//! buffers and emits only the changed cells. Out-of-bounds writes are
//! silently dropped, so drawing code never needs its own bounds checks.

use crate::cell::{Cell, CellAttrs, Rgba};
use folio_core::geometry::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A width × height grid of cells, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a blank buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Full-buffer rectangle.
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill a rectangle, clipped to the buffer.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.area());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Reallocate to a new size, blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    /// Print text with the given style, clipped at the buffer's right edge.
    /// Returns the x position after the last drawn grapheme.
    pub fn print_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, attrs: CellAttrs) -> u16 {
        self.print_text_clipped(x, y, text, fg, attrs, self.width)
    }

    /// Print text, stopping at `max_x` (exclusive).
    pub fn print_text_clipped(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        attrs: CellAttrs,
        max_x: u16,
    ) -> u16 {
        let mut cx = x;
        for grapheme in text.graphemes(true) {
            let w = UnicodeWidthStr::width(grapheme) as u16;
            if w == 0 {
                continue;
            }
            if cx + w > max_x {
                break;
            }
            if let Some(ch) = grapheme.chars().next() {
                self.set(cx, y, Cell { ch, fg, bg: Rgba::DEFAULT, attrs });
            }
            cx += w;
        }
        cx
    }

    /// Positions whose cells differ from `prev`. A size change yields every
    /// position.
    pub fn diff(&self, prev: &Buffer) -> Vec<(u16, u16)> {
        if self.width != prev.width || self.height != prev.height {
            return (0..self.height)
                .flat_map(|y| (0..self.width).map(move |x| (x, y)))
                .collect();
        }
        let mut changed = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let i = y as usize * self.width as usize + x as usize;
                if self.cells[i] != prev.cells[i] {
                    changed.push((x, y));
                }
            }
        }
        changed
    }
}

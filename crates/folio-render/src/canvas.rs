#![forbid(unsafe_code)]

//! Braille sub-pixel canvas.
//!
//! Each terminal cell maps to a 2 × 4 grid of dots (U+2800..U+28FF), giving
//! the visualizations a pixel surface eight times denser than the cell grid.
//! Drawing accumulates on the painter; [`Painter::blit`] folds the dots into
//! braille characters on a [`Buffer`]. Cells with no dots set are left
//! untouched so text drawn underneath survives.

use crate::buffer::Buffer;
use crate::cell::{Cell, CellAttrs, Rgba};
use folio_core::geometry::{Rect, Vec2};

/// Dots per cell, horizontally.
pub const PX_PER_CELL_X: u16 = 2;
/// Dots per cell, vertically.
pub const PX_PER_CELL_Y: u16 = 4;

// Braille dot bit for a (dx, dy) position within a cell.
const DOT_BITS: [[u32; 2]; 4] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

/// A pixel-level drawing surface.
#[derive(Debug, Clone)]
pub struct Painter {
    width: u16,
    height: u16,
    pixels: Vec<bool>,
    colors: Vec<Option<Rgba>>,
}

impl Painter {
    /// Create a painter with the given sub-pixel dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![false; len],
            colors: vec![None; len],
        }
    }

    /// Create a painter covering a cell area at full braille resolution.
    pub fn for_area(area: Rect) -> Self {
        Self::new(area.width * PX_PER_CELL_X, area.height * PX_PER_CELL_Y)
    }

    /// Width in sub-pixels.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in sub-pixels.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Clear all dots.
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.colors.fill(None);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u16) < self.width && (y as u16) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a single dot. Out-of-bounds dots are dropped.
    pub fn point(&mut self, x: i32, y: i32, color: Option<Rgba>) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = true;
            if color.is_some() {
                self.colors[idx] = color;
            }
        }
    }

    /// Whether a dot is set.
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|idx| self.pixels[idx])
    }

    /// Draw a line with Bresenham's algorithm.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Option<Rgba>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: i32 = if x0 < x1 { 1 } else { -1 };
        let sy: i32 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;

        loop {
            self.point(cx, cy, color);
            if cx == x1 && cy == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if cx == x1 {
                    break;
                }
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                if cy == y1 {
                    break;
                }
                err += dx;
                cy += sy;
            }
        }
    }

    /// Draw a circle outline with the midpoint algorithm.
    pub fn circle(&mut self, cx: i32, cy: i32, radius: i32, color: Option<Rgba>) {
        if radius <= 0 {
            self.point(cx, cy, color);
            return;
        }
        let mut x = radius;
        let mut y = 0;
        let mut d = 1 - radius;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.point(px, py, color);
            }
            y += 1;
            if d < 0 {
                d += 2 * y + 1;
            } else {
                x -= 1;
                d += 2 * (y - x) + 1;
            }
        }
    }

    /// Draw a filled circle.
    pub fn disc(&mut self, cx: i32, cy: i32, radius: i32, color: Option<Rgba>) {
        if radius <= 0 {
            self.point(cx, cy, color);
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.point(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Fold the dots into braille cells on `buf` within `area`.
    ///
    /// The last color set within a cell wins; dotless cells stay untouched.
    pub fn blit(&self, buf: &mut Buffer, area: Rect, default_fg: Rgba) {
        let cols = (self.width / PX_PER_CELL_X).min(area.width);
        let rows = (self.height / PX_PER_CELL_Y).min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let mut bits: u32 = 0;
                let mut color = None;
                for dy in 0..PX_PER_CELL_Y {
                    for dx in 0..PX_PER_CELL_X {
                        let px = (col * PX_PER_CELL_X + dx) as i32;
                        let py = (row * PX_PER_CELL_Y + dy) as i32;
                        if let Some(idx) = self.index(px, py) {
                            if self.pixels[idx] {
                                bits |= DOT_BITS[dy as usize][dx as usize];
                                if let Some(c) = self.colors[idx] {
                                    color = Some(c);
                                }
                            }
                        }
                    }
                }
                if bits == 0 {
                    continue;
                }
                let ch = char::from_u32(0x2800 + bits).unwrap_or(' ');
                buf.set(
                    area.x + col,
                    area.y + row,
                    Cell {
                        ch,
                        fg: color.unwrap_or(default_fg),
                        bg: Rgba::DEFAULT,
                        attrs: CellAttrs::empty(),
                    },
                );
            }
        }
    }

    /// Translate a mouse cell position into canvas-local sub-pixel space
    /// (the center of the cell). `None` when the cell is outside `area`.
    pub fn cell_to_px(area: Rect, x: u16, y: u16) -> Option<Vec2> {
        if !area.contains(x, y) {
            return None;
        }
        Some(Vec2::new(
            ((x - area.x) * PX_PER_CELL_X + PX_PER_CELL_X / 2) as f32,
            ((y - area.y) * PX_PER_CELL_Y + PX_PER_CELL_Y / 2) as f32,
        ))
    }
}

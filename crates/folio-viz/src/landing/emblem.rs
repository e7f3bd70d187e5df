#![forbid(unsafe_code)]

//! The rotating ouroboros emblem.
//!
//! Two renderers share one interface. The procedural variant samples a ring
//! brightness field rotated by the current angle, maps brightness through an
//! ASCII ramp, and tiers the glyph color; dark samples are skipped so the
//! surrounding canvas shows through. Narrow surfaces fall back to the
//! twelve hand-drawn frames.

use std::time::Duration;

use folio_core::geometry::Rect;
use folio_render::buffer::Buffer;
use folio_render::cell::{CellAttrs, Rgba};

use super::frames::{self, FRAME_INTERVAL, FRAMES};
use crate::theme;

/// Radians per millisecond.
const ROTATION_SPEED: f32 = 0.0003;

/// Brightness ramp, dark to light.
const RAMP: &[u8] = b" .,:;+*?%S#@";

/// Samples darker than this render nothing.
const DARK_CUTOFF: f32 = 15.0;

/// Below this surface width the frame-based renderer takes over.
const PROCEDURAL_MIN_WIDTH: u16 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Sampled ring field, sized in grid cells.
    Procedural { grid: u16 },
    /// Hand-drawn frame loop.
    Frames,
}

/// The emblem layer of the landing surface.
#[derive(Debug)]
pub struct Emblem {
    rotation: f32,
    mode: Mode,
    frame_index: usize,
    frame_elapsed: Duration,
}

impl Emblem {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            mode: Mode::Frames,
            frame_index: 0,
            frame_elapsed: Duration::ZERO,
        }
    }

    /// Size against a surface. Responsive: narrow surfaces use the frame
    /// loop, wider ones get a procedural grid scaled to the surface.
    pub fn init(&mut self, area: Rect) {
        self.mode = if area.width < PROCEDURAL_MIN_WIDTH || area.height < 16 {
            Mode::Frames
        } else {
            // A grid cell is roughly half as wide as it is tall, so the
            // emblem square is height-bound on typical terminals.
            let grid = (area.height.saturating_sub(6)).min(area.width / 3).max(12);
            Mode::Procedural { grid }
        };
    }

    /// Advance rotation and the frame loop.
    pub fn update(&mut self, dt: Duration) {
        self.rotation += ROTATION_SPEED * dt.as_millis() as f32;
        self.frame_elapsed += dt;
        while self.frame_elapsed >= FRAME_INTERVAL {
            self.frame_elapsed -= FRAME_INTERVAL;
            self.frame_index = (self.frame_index + 1) % FRAMES.len();
        }
    }

    /// Emblem center in cell coordinates.
    pub fn center_cell(&self, area: Rect) -> (u16, u16) {
        (area.x + area.width / 2, area.y + area.height / 2)
    }

    /// Approximate emblem radius in canvas sub-pixels, for positioning the
    /// section nodes around it.
    pub fn radius_px(&self, area: Rect) -> f32 {
        let cells = match self.mode {
            Mode::Procedural { grid } => grid as f32 * 0.6,
            Mode::Frames => frames::frame_height() as f32 * 0.8,
        };
        // Vertical cells are the tall axis; sub-pixel rows are 4 per cell.
        cells / 2.0 * 4.0
    }

    pub fn render(&self, buf: &mut Buffer, area: Rect) {
        match self.mode {
            Mode::Procedural { grid } => self.render_procedural(buf, area, grid),
            Mode::Frames => self.render_frames(buf, area),
        }
    }

    fn render_frames(&self, buf: &mut Buffer, area: Rect) {
        let frame = FRAMES[self.frame_index];
        let width = frames::frame_width();
        let height = frames::frame_height();
        let x0 = area.x + area.width.saturating_sub(width) / 2;
        let y0 = area.y + area.height.saturating_sub(height) / 2;

        for (row, line) in frame.lines().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let color = if ch == '@' || ch == 'V' {
                    theme::ACCENT
                } else {
                    theme::MID
                };
                buf.set(
                    x0 + col as u16,
                    y0 + row as u16,
                    folio_render::cell::Cell {
                        ch,
                        fg: color,
                        bg: Rgba::DEFAULT,
                        attrs: CellAttrs::empty(),
                    },
                );
            }
        }
    }

    fn render_procedural(&self, buf: &mut Buffer, area: Rect, grid: u16) {
        let (cx, cy) = self.center_cell(area);
        // Grid columns are doubled to compensate for cell aspect.
        let cols = grid * 2;
        let rows = grid;
        let x0 = cx.saturating_sub(cols / 2);
        let y0 = cy.saturating_sub(rows / 2);

        for row in 0..rows {
            for col in 0..cols {
                let brightness = self.sample(
                    (col as f32 + 0.5) / cols as f32 * 2.0 - 1.0,
                    (row as f32 + 0.5) / rows as f32 * 2.0 - 1.0,
                );
                if brightness < DARK_CUTOFF {
                    continue;
                }
                let idx = (brightness / 255.0 * (RAMP.len() - 1) as f32) as usize;
                let ch = RAMP[idx.min(RAMP.len() - 1)] as char;
                if ch == ' ' {
                    continue;
                }
                let fg = if brightness > 180.0 {
                    theme::FG
                } else if brightness > 100.0 {
                    theme::MID
                } else {
                    theme::DIM
                };
                buf.set(
                    x0 + col,
                    y0 + row,
                    folio_render::cell::Cell {
                        ch,
                        fg,
                        bg: Rgba::DEFAULT,
                        attrs: CellAttrs::empty(),
                    },
                );
            }
        }
    }

    /// Ring brightness at normalized coordinates in [-1, 1], 0..255.
    ///
    /// A gaussian band around the ring radius, modulated along the
    /// circumference so the bright head (at the rotation angle) trails off
    /// around the body.
    fn sample(&self, x: f32, y: f32) -> f32 {
        let r = (x * x + y * y).sqrt();
        let ring = (-((r - 0.72) * (r - 0.72)) / (2.0 * 0.013)).exp();
        let theta = y.atan2(x);
        let mut delta = theta - self.rotation;
        while delta > std::f32::consts::PI {
            delta -= std::f32::consts::TAU;
        }
        while delta < -std::f32::consts::PI {
            delta += std::f32::consts::TAU;
        }
        let body = 0.35 + 0.65 * (0.5 + 0.5 * delta.cos());
        (ring * body * 255.0).clamp(0.0, 255.0)
    }
}

impl Default for Emblem {
    fn default() -> Self {
        Self::new()
    }
}

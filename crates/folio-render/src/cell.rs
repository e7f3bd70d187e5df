#![forbid(unsafe_code)]

//! Cell and color types.
//!
//! A [`Cell`] is one terminal grid position: a character plus foreground,
//! background, and attribute flags. Colors are packed RGBA; alpha 0 means
//! "terminal default", which the presenter maps to a color reset.

use bitflags::bitflags;

/// Packed RGBA color, `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Terminal default color (alpha 0).
    pub const DEFAULT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xFF)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether this is the terminal-default sentinel.
    #[inline]
    pub const fn is_default(self) -> bool {
        self.a() == 0
    }

    /// Scale the channels by `factor` in [0, 1], keeping alpha.
    pub fn scale(self, factor: f32) -> Rgba {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * f) as u8;
        Rgba(
            ((scale(self.r()) as u32) << 24)
                | ((scale(self.g()) as u32) << 16)
                | ((scale(self.b()) as u32) << 8)
                | self.a() as u32,
        )
    }

    /// Uniform gray.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }
}

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellAttrs: u8 {
        const BOLD      = 0b0001;
        const DIM       = 0b0010;
        const UNDERLINE = 0b0100;
    }
}

/// One terminal grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: CellAttrs,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::DEFAULT,
            bg: Rgba::DEFAULT,
            attrs: CellAttrs::empty(),
        }
    }
}

impl Cell {
    /// A cell with the given character and default colors.
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            fg: Rgba::DEFAULT,
            bg: Rgba::DEFAULT,
            attrs: CellAttrs::empty(),
        }
    }

    /// Set the foreground (builder).
    #[must_use]
    pub const fn fg(mut self, fg: Rgba) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background (builder).
    #[must_use]
    pub const fn bg(mut self, bg: Rgba) -> Self {
        self.bg = bg;
        self
    }

    /// Set attribute flags (builder).
    #[must_use]
    pub fn attrs(mut self, attrs: CellAttrs) -> Self {
        self.attrs = attrs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_and_unpacks() {
        let c = Rgba::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.r(), 0x12);
        assert_eq!(c.g(), 0x34);
        assert_eq!(c.b(), 0x56);
        assert_eq!(c.a(), 0xFF);
        assert!(!c.is_default());
    }

    #[test]
    fn default_sentinel() {
        assert!(Rgba::DEFAULT.is_default());
        assert!(!Rgba::BLACK.is_default());
    }

    #[test]
    fn scale_darkens_and_clamps() {
        let c = Rgba::rgb(200, 100, 50).scale(0.5);
        assert_eq!((c.r(), c.g(), c.b()), (100, 50, 25));
        assert_eq!(c.a(), 0xFF);

        let full = Rgba::WHITE.scale(2.0);
        assert_eq!(full, Rgba::WHITE);
    }

    #[test]
    fn cell_default_is_blank() {
        let cell = Cell::default();
        assert_eq!(cell.ch, ' ');
        assert!(cell.fg.is_default());
        assert!(cell.attrs.is_empty());
    }

    #[test]
    fn cell_builders_compose() {
        let cell = Cell::from_char('x')
            .fg(Rgba::WHITE)
            .bg(Rgba::BLACK)
            .attrs(CellAttrs::BOLD | CellAttrs::UNDERLINE);
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.fg, Rgba::WHITE);
        assert!(cell.attrs.contains(CellAttrs::BOLD));
    }
}

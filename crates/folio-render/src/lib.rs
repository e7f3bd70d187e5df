#![forbid(unsafe_code)]

//! Rendering layer: a cell grid, a braille sub-pixel canvas, and a diffing
//! presenter that emits escape sequences through crossterm.

pub mod buffer;
pub mod canvas;
pub mod cell;
pub mod presenter;

pub use buffer::Buffer;
pub use canvas::Painter;
pub use cell::{Cell, CellAttrs, Rgba};
pub use presenter::Presenter;

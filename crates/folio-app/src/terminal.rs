#![forbid(unsafe_code)]

//! Terminal session guard.
//!
//! Raw mode, alternate screen, mouse capture, hidden cursor. Restoration
//! runs in `Drop` and again from a panic hook, so a crashing frame never
//! strands the user's shell in raw mode.

use std::io::{self, Write};

use crossterm::{cursor, event, execute, terminal};

/// RAII terminal session.
pub struct TerminalSession {
    restored: bool,
}

impl TerminalSession {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide
        )?;

        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore();
            default_hook(info);
        }));

        Ok(Self { restored: false })
    }

    /// Current terminal size in cells.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Restore the terminal early, before drop.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.restored {
            self.restored = true;
            restore()?;
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore();
        }
    }
}

fn restore() -> io::Result<()> {
    let mut out = io::stdout();
    execute!(
        out,
        cursor::Show,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;
    out.flush()
}

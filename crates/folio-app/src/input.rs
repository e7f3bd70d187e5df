#![forbid(unsafe_code)]

//! Crossterm event translation.
//!
//! The one place raw terminal events become the platform-free
//! [`InputEvent`] the rest of the workspace consumes.

use crossterm::event as cte;
use folio_core::input::{InputEvent, Key, Mouse, MouseButton, MouseKind};

/// Translate a crossterm event. `None` for events the app ignores.
pub fn translate(event: cte::Event) -> Option<InputEvent> {
    match event {
        cte::Event::Key(key) if key.kind != cte::KeyEventKind::Release => {
            translate_key(key).map(InputEvent::Key)
        }
        cte::Event::Mouse(mouse) => translate_mouse(mouse).map(InputEvent::Mouse),
        cte::Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        _ => None,
    }
}

fn translate_key(key: cte::KeyEvent) -> Option<Key> {
    Some(match key.code {
        cte::KeyCode::Char(c) => Key::Char(c),
        cte::KeyCode::Enter => Key::Enter,
        cte::KeyCode::Esc => Key::Escape,
        cte::KeyCode::Tab => Key::Tab,
        cte::KeyCode::BackTab => Key::BackTab,
        cte::KeyCode::Up => Key::Up,
        cte::KeyCode::Down => Key::Down,
        cte::KeyCode::Left => Key::Left,
        cte::KeyCode::Right => Key::Right,
        cte::KeyCode::PageUp => Key::PageUp,
        cte::KeyCode::PageDown => Key::PageDown,
        _ => return None,
    })
}

fn translate_mouse(mouse: cte::MouseEvent) -> Option<Mouse> {
    let kind = match mouse.kind {
        cte::MouseEventKind::Down(button) => MouseKind::Down(translate_button(button)),
        cte::MouseEventKind::Up(button) => MouseKind::Up(translate_button(button)),
        cte::MouseEventKind::Moved | cte::MouseEventKind::Drag(_) => MouseKind::Moved,
        cte::MouseEventKind::ScrollUp => MouseKind::ScrollUp,
        cte::MouseEventKind::ScrollDown => MouseKind::ScrollDown,
        _ => return None,
    };
    Some(Mouse {
        kind,
        x: mouse.column,
        y: mouse.row,
    })
}

fn translate_button(button: cte::MouseButton) -> MouseButton {
    match button {
        cte::MouseButton::Left => MouseButton::Left,
        cte::MouseButton::Right => MouseButton::Right,
        cte::MouseButton::Middle => MouseButton::Middle,
    }
}

/// Whether a key event asks the application to quit.
pub fn is_quit(key: &cte::KeyEvent) -> bool {
    matches!(key.code, cte::KeyCode::Char('q'))
        || (key.code == cte::KeyCode::Char('c')
            && key.modifiers.contains(cte::KeyModifiers::CONTROL))
}

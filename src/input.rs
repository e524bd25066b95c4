//! Key bindings: digits pick a colour, arrows/vim keys move the board cursor.

use crate::grid::ColorId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Palette colour by index (key `1` is colour 0).
    Choose(ColorId),
    ChooseAtCursor,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    Reset,
    Pause,
    Quit,
    None,
}

/// Map key event to game action. Supports both arrows and vim keys for the cursor.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char(c @ '1'..='8') => Action::Choose(c as u8 - b'1'),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r' | 'R') => Action::Reset,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Left | KeyCode::Char('h') => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::CursorRight,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::ChooseAtCursor,
        _ => Action::None,
    }
}

/// Cursor index after moving one step on a size×size board; stays put at the edges.
pub fn move_cursor(cursor: usize, size: usize, action: Action) -> usize {
    let (row, col) = (cursor / size, cursor % size);
    let (row, col) = match action {
        Action::CursorLeft => (row, col.saturating_sub(1)),
        Action::CursorRight => (row, (col + 1).min(size - 1)),
        Action::CursorUp => (row.saturating_sub(1), col),
        Action::CursorDown => ((row + 1).min(size - 1), col),
        _ => (row, col),
    };
    row * size + col
}

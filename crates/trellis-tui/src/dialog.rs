use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use trellis_core::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Cancel,
    Confirm,
}

/// Feeds one key into a single-line prompt.
///
/// `Enter` on a blank buffer only confirms when `allow_empty` is set.
pub fn handle_dialog_input(
    input: &mut InputState,
    key: KeyEvent,
    allow_empty: bool,
) -> DialogAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('u') => input.clear(),
            KeyCode::Char('a') => input.move_home(),
            KeyCode::Char('e') => input.move_end(),
            KeyCode::Char('h') => input.backspace(),
            _ => {}
        }
        return DialogAction::None;
    }

    match key.code {
        KeyCode::Esc => return DialogAction::Cancel,
        KeyCode::Enter if allow_empty || !input.is_empty() => return DialogAction::Confirm,
        KeyCode::Char('\x7f') | KeyCode::Backspace => input.backspace(),
        KeyCode::Char(c) => input.insert_char(c),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
    DialogAction::None
}

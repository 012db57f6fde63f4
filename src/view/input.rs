//! Key bindings: which directory action a key press stands for.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectNext,
    SelectPrevious,
    OpenCreate,
    EditSelected,
    DeleteSelected,
    FocusNext,
    FocusPrevious,
    Type(char),
    Erase,
    Submit,
    Cancel,
    Quit,
}

/// Key legend shown under the user list.
pub const LIST_KEYS: &str = "↑/↓ select • a add • e edit • d delete • q quit";
/// Key legend shown while the form is open.
pub const FORM_KEYS: &str = "Tab/↓ next field • ⇧Tab/↑ previous • Enter save • Esc cancel";

/// Maps a key press to an action. The same key means different things in
/// the list and in the open form.
pub fn action_for(key: KeyEvent, form_open: bool) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    if control && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if form_open {
        match key.code {
            KeyCode::Tab | KeyCode::Down => Some(Action::FocusNext),
            KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPrevious),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char('s') if control => Some(Action::Submit),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Backspace => Some(Action::Erase),
            KeyCode::Char(ch) if !control => Some(Action::Type(ch)),
            _ => None,
        }
    } else {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
            KeyCode::Char('a') => Some(Action::OpenCreate),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::EditSelected),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteSelected),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }
}

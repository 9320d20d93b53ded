use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press means on the timer screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Advance,
    Quit,
    Restart,
    OpenSettings,
    Exit,
}

/// What a key press means while the settings modal is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Digit(char),
    Backspace,
    SwitchField,
    Save,
    Cancel,
    Exit,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub fn map_key(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl_c(key) {
        return Some(Action::Exit);
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('n') => Some(Action::Advance),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::OpenSettings),
        KeyCode::Esc => Some(Action::Exit),
        _ => None,
    }
}

pub fn map_form_key(key: &KeyEvent) -> Option<FormAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl_c(key) {
        return Some(FormAction::Exit);
    }

    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(FormAction::Digit(c)),
        KeyCode::Backspace => Some(FormAction::Backspace),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            Some(FormAction::SwitchField)
        }
        KeyCode::Enter => Some(FormAction::Save),
        KeyCode::Esc => Some(FormAction::Cancel),
        _ => None,
    }
}

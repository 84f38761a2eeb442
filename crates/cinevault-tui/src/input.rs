use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, Mode, Screen};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Next,
    Previous,
    Activate,
    Back,
    Refresh,
    StartSearch,
    ToggleTheme,
    ToggleLoop,
    CycleKind,
    ToggleWindow,
    OpenInBrowser,
    Help,
    ScrollDown,
    ScrollUp,
    ExitMode,
    Confirm,
    Cancel,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    // Handle input mode (search)
    if app.is_input_mode() {
        return handle_input_mode(key);
    }

    match &app.mode {
        Mode::Help => {
            // Any key exits help
            return Action::ExitMode;
        }
        Mode::Error(_) => return handle_error_mode(key, keymap),
        _ => {}
    }

    let binding = KeyBinding::new(key.code, key.modifiers);
    let action = keymap.get(&binding).cloned().unwrap_or(Action::None);

    match app.screen {
        Screen::Browse => match action {
            // Nothing to go back to from the strip
            Action::Back => Action::None,
            Action::ExitMode if !app.filter.is_empty() => Action::Cancel,
            other => other,
        },
        Screen::Detail => match action {
            Action::ExitMode => Action::Back,
            // The strip is hidden, so up/down scroll the detail text
            Action::Next => Action::ScrollDown,
            Action::Previous => Action::ScrollUp,
            Action::Activate
            | Action::StartSearch
            | Action::ToggleLoop
            | Action::CycleKind
            | Action::ToggleWindow
            | Action::Refresh => Action::None,
            other => other,
        },
    }
}

/// Handle key events in input mode (search)
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Handle key events while the error panel is shown
fn handle_error_mode(key: KeyEvent, keymap: &Keymap) -> Action {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => Action::ExitMode,
        _ => match keymap.get(&KeyBinding::new(key.code, key.modifiers)) {
            Some(Action::Quit) => Action::Quit,
            Some(Action::Refresh) => Action::Refresh,
            _ => Action::None,
        },
    }
}

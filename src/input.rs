use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Select,
    Back,
    Refresh,
    OpenBrowser,
    /// Left click at a terminal row (absolute coordinates).
    Click(u16),
    None,
}

/// Which screen is on top of the navigation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenKind {
    #[default]
    History,
    Detail,
}

/// Captures the UI state needed to interpret an input event.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub has_error: bool,
    pub is_loading: bool,
    pub screen: ScreenKind,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let shared = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::End | KeyCode::Char('G') => Some(Action::Bottom),
        KeyCode::Char('o') => Some(Action::OpenBrowser),
        _ => None,
    };
    if let Some(action) = shared {
        return action;
    }

    match ctx.screen {
        ScreenKind::Detail => match key.code {
            KeyCode::Esc if ctx.has_error => Action::DismissError,
            KeyCode::Esc
            | KeyCode::Backspace
            | KeyCode::Left
            | KeyCode::Char('q' | 'h') => Action::Back,
            _ => Action::None,
        },
        ScreenKind::History => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => {
                if ctx.has_error {
                    Action::DismissError
                } else {
                    Action::Quit
                }
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l' | ' ') => Action::Select,
            KeyCode::Char('r') if !ctx.is_loading => Action::Refresh,
            _ => Action::None,
        },
    }
}

pub fn map_mouse(mouse: MouseEvent, ctx: &InputContext) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if ctx.screen == ScreenKind::History => {
            Action::Click(mouse.row)
        }
        MouseEventKind::ScrollUp => Action::MoveUp,
        MouseEventKind::ScrollDown => Action::MoveDown,
        _ => Action::None,
    }
}

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Up,
    Down,
    Enter,
    Back,
    Next,
    Previous,
    /// Jump to the card at this zero-based index.
    Jump(usize),
    Delete,
    Yes,
    No,
    None,
}

pub fn map_event(ev: Event) -> Action {
    let Event::Key(KeyEvent { code, kind, .. }) = ev else {
        return Action::None;
    };
    if kind == KeyEventKind::Release {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Backspace => Action::Back,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Enter => Action::Enter,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => Action::Next,
        KeyCode::Left | KeyCode::Char('h') => Action::Previous,
        KeyCode::Char('d') | KeyCode::Delete => Action::Delete,
        KeyCode::Char('y') => Action::Yes,
        KeyCode::Char('n') => Action::No,
        KeyCode::Char(c @ '1'..='9') => Action::Jump(c as usize - '1' as usize),
        _ => Action::None,
    }
}

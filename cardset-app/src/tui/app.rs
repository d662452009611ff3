use crate::tui::{inputs::{map_event, Action}, views::{self, View}};
use cardset_core::{FlashcardStore, GroupId, ReviewCursor, Storage};
use crossterm::{
    event::{self},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Listing,
    Detail { id: GroupId, cursor: ReviewCursor },
}

pub struct TuiApp<S: Storage> {
    store: FlashcardStore<S>,
    sel: usize,
    screen: Screen,
    confirm: Option<GroupId>,
    status: Option<String>,
}

impl<S: Storage> TuiApp<S> {
    pub fn new(store: FlashcardStore<S>) -> Self {
        Self { store, sel: 0, screen: Screen::Listing, confirm: None, status: None }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| {
                let view = match &self.screen {
                    Screen::Listing => View::Listing { groups: self.store.groups(), sel: self.sel },
                    Screen::Detail { id, cursor } => match self.store.get(id) {
                        Some(group) => View::Detail { group, cursor },
                        None => View::NotFound { id },
                    },
                };
                let confirm = self
                    .confirm
                    .as_deref()
                    .and_then(|id| self.store.get(id))
                    .map(|g| g.title.as_str());
                views::draw_ui(f, f.size(), view, confirm, self.status.as_deref());
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                let action = map_event(event::read()?);
                if !self.handle(action) {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Applies one key action; returns `false` when the app should exit.
    fn handle(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return false;
        }
        if action != Action::None {
            self.status = None;
        }

        if let Some(id) = self.confirm.clone() {
            match action {
                Action::Yes | Action::Enter => self.delete_confirmed(&id),
                Action::No | Action::Back => self.confirm = None,
                _ => {}
            }
            return true;
        }

        if self.screen == Screen::Listing {
            self.handle_listing(action);
        } else {
            self.handle_detail(action);
        }
        true
    }

    fn handle_listing(&mut self, action: Action) {
        match action {
            Action::Up => self.sel = self.sel.saturating_sub(1),
            Action::Down => {
                if self.sel + 1 < self.store.len() {
                    self.sel += 1;
                }
            }
            Action::Enter => self.open_selected(),
            Action::Delete => {
                self.confirm = self.store.groups().get(self.sel).map(|g| g.id.clone());
            }
            _ => {}
        }
    }

    fn handle_detail(&mut self, action: Action) {
        let Screen::Detail { id, cursor } = &mut self.screen else {
            return;
        };
        match action {
            Action::Back => self.screen = Screen::Listing,
            Action::Next | Action::Down => {
                cursor.next();
            }
            Action::Previous | Action::Up => {
                cursor.previous();
            }
            Action::Jump(i) => {
                if let Err(e) = cursor.jump_to(i) {
                    self.status = Some(e.to_string());
                }
            }
            Action::Delete => {
                if self.store.get(id).is_some() {
                    self.confirm = Some(id.clone());
                }
            }
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        let Some(group) = self.store.groups().get(self.sel) else {
            return;
        };
        match ReviewCursor::new(group.term_count()) {
            Ok(cursor) => self.screen = Screen::Detail { id: group.id.clone(), cursor },
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn delete_confirmed(&mut self, id: &str) {
        self.confirm = None;
        self.store.delete(id);
        if matches!(&self.screen, Screen::Detail { id: open, .. } if open == id) {
            self.screen = Screen::Listing;
        }
        self.sel = self.sel.min(self.store.len().saturating_sub(1));
        self.status = Some(match self.store.last_persist_error() {
            Some(e) => format!("Deleted, but could not save: {e}"),
            None => "Deleted".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardset_core::{GroupDraft, MemoryStorage};

    fn app() -> TuiApp<MemoryStorage> {
        let mut store = FlashcardStore::open(MemoryStorage::new());
        for title in ["A", "B"] {
            store.create(
                GroupDraft::new(title, "d")
                    .with_term("1", "one")
                    .with_term("2", "two")
                    .with_term("3", "three")
                    .validate()
                    .unwrap(),
            );
        }
        TuiApp::new(store)
    }

    fn cursor_pos(app: &TuiApp<MemoryStorage>) -> Option<usize> {
        match &app.screen {
            Screen::Detail { cursor, .. } => Some(cursor.position()),
            Screen::Listing => None,
        }
    }

    #[test]
    fn open_and_navigate_detail() {
        let mut app = app();
        app.handle(Action::Down);
        app.handle(Action::Enter);
        let Screen::Detail { id, .. } = &app.screen else { panic!("expected detail") };
        assert_eq!(app.store.get(id).unwrap().title, "B");
        assert_eq!(cursor_pos(&app), Some(0));
        app.handle(Action::Previous);
        assert_eq!(cursor_pos(&app), Some(2));
        app.handle(Action::Next);
        assert_eq!(cursor_pos(&app), Some(0));
        app.handle(Action::Jump(1));
        assert_eq!(cursor_pos(&app), Some(1));
    }

    #[test]
    fn bad_jump_keeps_position_and_reports() {
        let mut app = app();
        app.handle(Action::Enter);
        app.handle(Action::Jump(1));
        app.handle(Action::Jump(7));
        assert_eq!(cursor_pos(&app), Some(1));
        assert!(app.status.as_deref().unwrap().contains("out of range"));
    }

    #[test]
    fn back_resets_cursor_on_reopen() {
        let mut app = app();
        app.handle(Action::Enter);
        app.handle(Action::Next);
        app.handle(Action::Back);
        assert_eq!(app.screen, Screen::Listing);
        app.handle(Action::Enter);
        assert_eq!(cursor_pos(&app), Some(0));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        app.handle(Action::Down);
        app.handle(Action::Delete);
        assert!(app.confirm.is_some());
        app.handle(Action::No);
        assert_eq!(app.store.len(), 2);

        app.handle(Action::Delete);
        app.handle(Action::Yes);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.sel, 0);
        assert_eq!(app.status.as_deref(), Some("Deleted"));
    }

    #[test]
    fn deleting_open_group_returns_to_listing() {
        let mut app = app();
        app.handle(Action::Enter);
        app.handle(Action::Delete);
        app.handle(Action::Yes);
        assert_eq!(app.screen, Screen::Listing);
        assert_eq!(app.store.groups()[0].title, "B");
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = app();
        assert!(app.handle(Action::Down));
        assert!(!app.handle(Action::Quit));
    }
}

//! TUI shell: terminal lifecycle, event loop, key translation (impure).
//!
//! All session logic lives in [`crate::state`]; this module only turns raw
//! crossterm events into [`UiEvent`]s (the translation depends on focus and
//! mode), drives redraws, and expires the status line on timer ticks.

mod draw;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use thiserror::Error;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::export::Exporter;
use crate::model::StoreError;
use crate::state::{AppState, Focus, Mode, UiEvent};
use crate::store::{LevelDbStore, Store};

/// Timer interval for the event loop; bounds status-expiry latency.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Errors that can occur during TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations.
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Store access failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Main TUI application.
///
/// Generic over the ratatui backend and the store so the whole shell runs
/// under `TestBackend` + `MemStore` in tests.
pub struct TuiApp<B, S>
where
    B: ratatui::backend::Backend,
    S: Store,
{
    terminal: Terminal<B>,
    state: AppState,
    store: S,
    exporter: Exporter,
    list_state: ListState,
}

impl TuiApp<CrosstermBackend<Stdout>, LevelDbStore> {
    /// Put the terminal into raw mode on the alternate screen and load the
    /// first page.
    pub fn new(store: LevelDbStore, config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::from_parts(terminal, store, config))
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        loop {
            if event::poll(TICK_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.on_key(key);
                        if self.state.should_quit() {
                            info!("quit requested");
                            return Ok(());
                        }
                        self.draw()?;
                    }
                    Event::Resize(_, _) => self.draw()?,
                    _ => {}
                }
            } else if self.state.status.tick(Instant::now()) {
                // Status message expired; repaint the hint bar.
                self.draw()?;
            }
        }
    }
}

/// Create the TUI over an opened store, run it, and restore the terminal on
/// every exit path (including errors).
pub fn run_with_store(store: LevelDbStore, config: &ResolvedConfig) -> Result<(), TuiError> {
    let mut app = match TuiApp::new(store, config) {
        Ok(app) => app,
        Err(err) => {
            restore_terminal();
            return Err(err);
        }
    };
    let result = app.run();
    let _ = app.terminal.show_cursor();
    restore_terminal();
    result
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

impl<B, S> TuiApp<B, S>
where
    B: ratatui::backend::Backend,
    S: Store,
{
    /// Assemble an application from an already-initialized terminal.
    pub fn from_parts(terminal: Terminal<B>, mut store: S, config: &ResolvedConfig) -> Self {
        let mut state = AppState::new(config.page_size);
        state.init(&mut store, Instant::now());
        Self {
            terminal,
            state,
            store,
            exporter: Exporter::new(config.dump_dir.clone()),
            list_state: ListState::default(),
        }
    }

    /// Session state (read-only; used by tests).
    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let state = &self.state;
        let list_state = &mut self.list_state;
        self.terminal
            .draw(|frame| draw::render(frame, state, list_state))?;
        Ok(())
    }

    /// Translate one key press and dispatch the resulting event, if any.
    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits, regardless of focus.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.dispatch(UiEvent::Quit);
            return;
        }

        if self.state.mode == Mode::Value {
            match key.code {
                KeyCode::Esc => self.dispatch(UiEvent::LeaveValueView),
                KeyCode::Down => self.state.scroll_value_down(),
                KeyCode::Up => self.state.scroll_value_up(),
                _ => {}
            }
            return;
        }

        if self.state.focus == Focus::Search {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.dispatch(UiEvent::FocusList),
                KeyCode::Char(ch) => {
                    let mut text = self.state.filter_text.clone();
                    text.push(ch);
                    self.dispatch(UiEvent::FilterChanged(text));
                }
                KeyCode::Backspace => {
                    let mut text = self.state.filter_text.clone();
                    text.pop();
                    self.dispatch(UiEvent::FilterChanged(text));
                }
                _ => {}
            }
            return;
        }

        // Key list focus.
        match key.code {
            KeyCode::Up => {
                let target = self.state.selected.saturating_sub(1);
                self.dispatch(UiEvent::SelectionChanged(target));
            }
            KeyCode::Down => {
                let at_end = self.state.selected + 1 >= self.state.pager().len();
                if at_end && self.state.pager().has_more() {
                    self.dispatch(UiEvent::ScrollPastEnd);
                } else if !at_end {
                    let target = self.state.selected + 1;
                    self.dispatch(UiEvent::SelectionChanged(target));
                }
            }
            KeyCode::Enter => self.dispatch(UiEvent::EnterValueView),
            KeyCode::Char('d' | 'D') => self.dispatch(UiEvent::DumpSelected),
            KeyCode::Char('a' | 'A') => self.dispatch(UiEvent::DumpAll),
            KeyCode::Char('h' | 'H') => self.dispatch(UiEvent::ToggleHelp),
            KeyCode::Char('/') => self.dispatch(UiEvent::FocusSearch),
            KeyCode::Char('q' | 'Q') => self.dispatch(UiEvent::Quit),
            _ => {}
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        self.state
            .dispatch(&mut self.store, &self.exporter, event, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(store: MemStore) -> (TuiApp<TestBackend, MemStore>, TempDir) {
        let tmp = TempDir::new().unwrap();
        let config = ResolvedConfig {
            page_size: 2,
            dump_dir: tmp.path().to_path_buf(),
            log_file_path: tmp.path().join("ldbv.log"),
        };
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        (TuiApp::from_parts(terminal, store, &config), tmp)
    }

    fn fruit_store() -> MemStore {
        MemStore::from_pairs([("apple", "1"), ("Banana", "2"), ("cherry", "3")])
    }

    #[test]
    fn arrow_keys_move_selection() {
        let (mut app, _tmp) = app(fruit_store());
        assert_eq!(app.state().selected, 0);

        app.on_key(press(KeyCode::Down));
        assert_eq!(app.state().selected, 1);
        app.on_key(press(KeyCode::Up));
        assert_eq!(app.state().selected, 0);
        // Up at the top stays put.
        app.on_key(press(KeyCode::Up));
        assert_eq!(app.state().selected, 0);
    }

    #[test]
    fn down_past_end_extends_the_page() {
        let (mut app, _tmp) = app(fruit_store());
        app.on_key(press(KeyCode::Down));
        assert_eq!(app.state().pager().len(), 2);

        app.on_key(press(KeyCode::Down));
        assert_eq!(app.state().pager().len(), 3);
        assert_eq!(app.state().selected, 2);
    }

    #[test]
    fn down_at_end_without_more_does_nothing() {
        let (mut app, _tmp) = app(MemStore::from_pairs([("only", "v")]));
        app.on_key(press(KeyCode::Down));
        assert_eq!(app.state().selected, 0);
        assert_eq!(app.state().pager().len(), 1);
    }

    #[test]
    fn search_focus_routes_characters_to_the_filter() {
        let (mut app, _tmp) = app(fruit_store());
        app.on_key(press(KeyCode::Char('/')));
        assert_eq!(app.state().focus, Focus::Search);

        app.on_key(press(KeyCode::Char('a')));
        app.on_key(press(KeyCode::Char('n')));
        assert_eq!(app.state().filter_text, "an");
        assert_eq!(app.state().pager().len(), 1);

        // 'q' edits the filter instead of quitting while search is focused.
        app.on_key(press(KeyCode::Char('q')));
        assert!(!app.state().should_quit());
        assert_eq!(app.state().filter_text, "anq");

        app.on_key(press(KeyCode::Backspace));
        assert_eq!(app.state().filter_text, "an");

        app.on_key(press(KeyCode::Esc));
        assert_eq!(app.state().focus, Focus::List);
    }

    #[test]
    fn enter_and_escape_toggle_value_view() {
        let (mut app, _tmp) = app(fruit_store());
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.state().mode, Mode::Value);

        // Arrows scroll the value pane instead of moving the selection.
        app.on_key(press(KeyCode::Down));
        assert_eq!(app.state().selected, 0);
        assert_eq!(app.state().value_scroll, 1);

        app.on_key(press(KeyCode::Esc));
        assert_eq!(app.state().mode, Mode::Keys);
    }

    #[test]
    fn quit_keys_set_the_quit_flag() {
        let (mut app, _tmp) = app(fruit_store());
        app.on_key(press(KeyCode::Char('q')));
        assert!(app.state().should_quit());

        let (mut app, _tmp) = self::app(fruit_store());
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.state().should_quit());
    }

    #[test]
    fn dump_key_writes_file_and_sets_status() {
        let (mut app, tmp) = app(fruit_store());
        app.on_key(press(KeyCode::Char('d')));
        assert!(tmp.path().join("Banana.txt").exists());
        assert!(app.state().status.current().is_some());
    }

    #[test]
    fn draw_succeeds_on_test_backend() {
        let (mut app, _tmp) = app(fruit_store());
        app.draw().unwrap();
        app.on_key(press(KeyCode::Char('h')));
        assert!(app.state().help_visible);
        app.draw().unwrap();
    }
}

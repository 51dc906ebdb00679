//! Session controller.
//!
//! One `AppState` owns all mutable session state: the pager, the view mode,
//! the selection, the search text, and the status line. The store and the
//! exporter are passed into `dispatch` by reference; nothing here is global
//! and nothing here touches the terminal.

use std::time::Instant;

use tracing::warn;

use crate::export::{format_entry, Exporter};
use crate::model::Key;
use crate::pager::{FilterSpec, Pager};
use crate::state::{StatusKind, StatusLine, UiEvent};
use crate::store::Store;

/// Which view occupies the main area. The two modes are mutually exclusive
/// views of the same session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Key list with a tracked selection; value shown as a side preview.
    #[default]
    Keys,
    /// Full attention on one key and its rendered value.
    Value,
}

/// Which widget receives keystrokes while in [`Mode::Keys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The key list.
    #[default]
    List,
    /// The search input field.
    Search,
}

/// Rendered entry for the value pane.
#[derive(Debug, Clone)]
pub struct CurrentEntry {
    /// The selected key.
    pub key: Key,
    /// `Key: …\n\nValue: …` text, rendered binary-safe.
    pub text: String,
}

/// All mutable session state, driven by [`UiEvent`]s.
#[derive(Debug, Clone)]
pub struct AppState {
    pager: Pager,
    /// Current view mode.
    pub mode: Mode,
    /// Current input focus (meaningful in `Mode::Keys`).
    pub focus: Focus,
    /// Selected index into the pager's keys.
    pub selected: usize,
    /// Live contents of the search field.
    pub filter_text: String,
    /// Whether the help overlay is up.
    pub help_visible: bool,
    /// Transient status line.
    pub status: StatusLine,
    /// Vertical scroll offset of the value pane in `Mode::Value`.
    pub value_scroll: u16,
    current: Option<CurrentEntry>,
    should_quit: bool,
}

impl AppState {
    /// New session with an unloaded pager of the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            mode: Mode::default(),
            focus: Focus::default(),
            selected: 0,
            filter_text: String::new(),
            help_visible: false,
            status: StatusLine::new(),
            value_scroll: 0,
            current: None,
            should_quit: false,
        }
    }

    /// Load the first page with an empty filter and preview the first key.
    pub fn init<S: Store>(&mut self, store: &mut S, now: Instant) {
        self.reload(store, FilterSpec::new(""), now);
    }

    /// The pager (read-only; all mutation goes through events).
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Entry previewed in the value pane, if any.
    pub fn current(&self) -> Option<&CurrentEntry> {
        self.current.as_ref()
    }

    /// Whether a quit event has been dispatched.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply one event. This is the only entry point for state transitions.
    pub fn dispatch<S: Store>(
        &mut self,
        store: &mut S,
        exporter: &Exporter,
        event: UiEvent,
        now: Instant,
    ) {
        match event {
            UiEvent::FilterChanged(text) => {
                self.filter_text = text.clone();
                self.reload(store, FilterSpec::new(text), now);
            }
            UiEvent::SelectionChanged(index) => self.select(store, index, now),
            UiEvent::ScrollPastEnd => self.extend_page(store, now),
            UiEvent::EnterValueView => {
                if self.current.is_some() {
                    self.mode = Mode::Value;
                    self.value_scroll = 0;
                }
            }
            UiEvent::LeaveValueView => self.mode = Mode::Keys,
            UiEvent::DumpSelected => self.dump_selected(store, exporter, now),
            UiEvent::DumpAll => self.dump_all(store, exporter, now),
            UiEvent::ToggleHelp => self.help_visible = !self.help_visible,
            UiEvent::FocusSearch => self.focus = Focus::Search,
            UiEvent::FocusList => self.focus = Focus::List,
            UiEvent::Quit => self.should_quit = true,
        }
    }

    /// Scroll the value pane down one line.
    pub fn scroll_value_down(&mut self) {
        self.value_scroll = self.value_scroll.saturating_add(1);
    }

    /// Scroll the value pane up one line.
    pub fn scroll_value_up(&mut self) {
        self.value_scroll = self.value_scroll.saturating_sub(1);
    }

    fn reload<S: Store>(&mut self, store: &mut S, spec: FilterSpec, now: Instant) {
        if let Err(err) = self.pager.reset(store, spec) {
            warn!(%err, "page load failed");
            self.status.set(StatusKind::Error, format!("Error: {err}"), now);
        }
        self.selected = 0;
        self.refresh_current(store, now);
    }

    fn select<S: Store>(&mut self, store: &mut S, index: usize, now: Instant) {
        if self.pager.is_empty() {
            self.selected = 0;
            self.current = None;
            return;
        }
        self.selected = index.min(self.pager.len() - 1);
        self.refresh_current(store, now);
    }

    fn extend_page<S: Store>(&mut self, store: &mut S, now: Instant) {
        match self.pager.extend(store) {
            Ok(true) => {
                // Follow the newly revealed key, as the list widget does.
                self.selected = (self.selected + 1).min(self.pager.len() - 1);
                self.status.set(
                    StatusKind::Success,
                    format!("Loaded {} keys total", self.pager.len()),
                    now,
                );
                self.refresh_current(store, now);
            }
            Ok(false) => {}
            Err(err) => {
                warn!(%err, "page extend failed");
                self.status.set(StatusKind::Error, format!("Error: {err}"), now);
            }
        }
    }

    /// Point-lookup the selected key and render it for the value pane.
    fn refresh_current<S: Store>(&mut self, store: &mut S, now: Instant) {
        let Some(key) = self.pager.keys().get(self.selected).cloned() else {
            self.current = None;
            return;
        };
        match store.get(key.as_bytes()) {
            Ok(Some(value)) => {
                let text = format_entry(&key, &value);
                self.current = Some(CurrentEntry { key, text });
            }
            Ok(None) => {
                // Key vanished between listing and lookup; report, keep list.
                self.status.set(
                    StatusKind::Error,
                    format!("Error: key '{}' not found", key.display()),
                    now,
                );
                self.current = None;
            }
            Err(err) => {
                warn!(%err, "point lookup failed");
                self.status.set(StatusKind::Error, format!("Error: {err}"), now);
                self.current = None;
            }
        }
    }

    fn dump_selected<S: Store>(&mut self, store: &mut S, exporter: &Exporter, now: Instant) {
        let Some(entry) = self.current.as_ref() else {
            self.status.set(StatusKind::Error, "Invalid selection", now);
            return;
        };
        let key = entry.key.clone();
        match exporter.dump_one(store, &key) {
            Ok(path) => self.status.set(
                StatusKind::Success,
                format!("Dumped to {}", path.display()),
                now,
            ),
            Err(err) => {
                warn!(%err, "single-entry dump failed");
                self.status.set(StatusKind::Error, format!("Error: {err}"), now);
            }
        }
    }

    fn dump_all<S: Store>(&mut self, store: &mut S, exporter: &Exporter, now: Instant) {
        match exporter.dump_all(store) {
            Ok(report) => self.status.set(
                StatusKind::Success,
                format!("Dumped {} keys to {}", report.exported, report.path.display()),
                now,
            ),
            Err(err) => {
                warn!(%err, "full dump failed");
                self.status.set(StatusKind::Error, format!("Error: {err}"), now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use tempfile::TempDir;

    fn setup() -> (MemStore, Exporter, AppState, Instant, TempDir) {
        let store = MemStore::from_pairs([("apple", "1"), ("Banana", "2"), ("cherry", "3")]);
        let tmp = TempDir::new().unwrap();
        let exporter = Exporter::new(tmp.path());
        let state = AppState::new(2);
        (store, exporter, state, Instant::now(), tmp)
    }

    #[test]
    fn init_loads_first_page_and_previews_first_key() {
        let (mut store, _exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);

        assert_eq!(state.pager().len(), 2);
        assert_eq!(state.selected, 0);
        let current = state.current().expect("first key previewed");
        assert_eq!(current.key.display(), "Banana");
        assert!(current.text.starts_with("Key: Banana\n\nValue: "));
    }

    #[test]
    fn filter_change_resets_selection_and_page() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);
        state.dispatch(&mut store, &exporter, UiEvent::SelectionChanged(1), now);

        state.dispatch(
            &mut store,
            &exporter,
            UiEvent::FilterChanged("an".to_string()),
            now,
        );
        assert_eq!(state.selected, 0);
        assert_eq!(state.pager().len(), 1);
        assert_eq!(state.current().unwrap().key.display(), "Banana");
    }

    #[test]
    fn scroll_past_end_extends_and_follows_new_key() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);
        state.dispatch(&mut store, &exporter, UiEvent::SelectionChanged(1), now);
        assert!(state.pager().has_more());

        state.dispatch(&mut store, &exporter, UiEvent::ScrollPastEnd, now);
        assert_eq!(state.pager().len(), 3);
        assert_eq!(state.selected, 2);
        assert_eq!(state.current().unwrap().key.display(), "cherry");
        let (kind, text) = state.status.current().unwrap();
        assert_eq!(kind, StatusKind::Success);
        assert_eq!(text, "Loaded 3 keys total");
    }

    #[test]
    fn enter_value_view_requires_a_current_entry() {
        let (_, exporter, mut state, now, _tmp) = setup();
        let mut empty = MemStore::new();
        state.init(&mut empty, now);

        state.dispatch(&mut empty, &exporter, UiEvent::EnterValueView, now);
        assert_eq!(state.mode, Mode::Keys);
    }

    #[test]
    fn value_view_round_trip_resets_scroll() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);

        state.dispatch(&mut store, &exporter, UiEvent::EnterValueView, now);
        assert_eq!(state.mode, Mode::Value);
        state.scroll_value_down();
        state.scroll_value_down();
        assert_eq!(state.value_scroll, 2);

        state.dispatch(&mut store, &exporter, UiEvent::LeaveValueView, now);
        assert_eq!(state.mode, Mode::Keys);

        state.dispatch(&mut store, &exporter, UiEvent::EnterValueView, now);
        assert_eq!(state.value_scroll, 0, "re-entering starts at the top");
    }

    #[test]
    fn dump_selected_reports_path_in_status() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);

        state.dispatch(&mut store, &exporter, UiEvent::DumpSelected, now);
        let (kind, text) = state.status.current().unwrap();
        assert_eq!(kind, StatusKind::Success);
        assert!(text.starts_with("Dumped to "));
        assert!(text.ends_with("Banana.txt"));
    }

    #[test]
    fn dump_all_ignores_active_filter() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);
        state.dispatch(
            &mut store,
            &exporter,
            UiEvent::FilterChanged("an".to_string()),
            now,
        );

        state.dispatch(&mut store, &exporter, UiEvent::DumpAll, now);
        let (kind, text) = state.status.current().unwrap();
        assert_eq!(kind, StatusKind::Success);
        assert!(text.starts_with("Dumped 3 keys to "), "got: {text}");
    }

    #[test]
    fn dump_without_selection_reports_invalid() {
        let (_, exporter, mut state, now, _tmp) = setup();
        let mut empty = MemStore::new();
        state.init(&mut empty, now);

        state.dispatch(&mut empty, &exporter, UiEvent::DumpSelected, now);
        let (kind, text) = state.status.current().unwrap();
        assert_eq!(kind, StatusKind::Error);
        assert_eq!(text, "Invalid selection");
    }

    #[test]
    fn iterator_error_surfaces_on_status_and_keeps_partial_page() {
        let (_, exporter, mut state, now, _tmp) = setup();
        let mut store = MemStore::from_pairs([("a", "1"), ("b", "2"), ("c", "3")]);
        store.fail_iteration_after(2);

        state.dispatch(
            &mut store,
            &exporter,
            UiEvent::FilterChanged(String::new()),
            now,
        );
        let (kind, _) = state.status.current().unwrap();
        assert_eq!(kind, StatusKind::Error);
        assert_eq!(state.pager().len(), 2, "partial page survives the error");
    }

    #[test]
    fn focus_and_help_and_quit_transitions() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);

        state.dispatch(&mut store, &exporter, UiEvent::FocusSearch, now);
        assert_eq!(state.focus, Focus::Search);
        state.dispatch(&mut store, &exporter, UiEvent::FocusList, now);
        assert_eq!(state.focus, Focus::List);

        state.dispatch(&mut store, &exporter, UiEvent::ToggleHelp, now);
        assert!(state.help_visible);
        state.dispatch(&mut store, &exporter, UiEvent::ToggleHelp, now);
        assert!(!state.help_visible);

        assert!(!state.should_quit());
        state.dispatch(&mut store, &exporter, UiEvent::Quit, now);
        assert!(state.should_quit());
    }

    #[test]
    fn selection_is_clamped_to_page_bounds() {
        let (mut store, exporter, mut state, now, _tmp) = setup();
        state.init(&mut store, now);

        state.dispatch(&mut store, &exporter, UiEvent::SelectionChanged(99), now);
        assert_eq!(state.selected, 1);
    }
}

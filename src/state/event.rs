//! UI events consumed by the session controller.

/// Discrete input events, dispatched single-threaded to [`crate::state::AppState`].
///
/// Each variant maps to one controller method; the view layer owns the
/// translation from raw key presses (which depends on focus and mode) and
/// never touches session state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Search text changed; restarts pagination under the new filter.
    FilterChanged(String),
    /// List selection moved to the given index.
    SelectionChanged(usize),
    /// User scrolled past the last visible key with more data pending.
    ScrollPastEnd,
    /// Switch to the full-screen value view for the selected key.
    EnterValueView,
    /// Return from the value view to the key list.
    LeaveValueView,
    /// Export the selected entry to its own file.
    DumpSelected,
    /// Export the whole store to the aggregate file.
    DumpAll,
    /// Show or hide the help overlay.
    ToggleHelp,
    /// Move input focus to the search field.
    FocusSearch,
    /// Return input focus to the key list.
    FocusList,
    /// Exit the application.
    Quit,
}

//! Session state machine (pure).
//!
//! All transitions run on the event-dispatch thread and are testable
//! without a terminal; the `view` layer only translates raw input into
//! [`UiEvent`]s and paints whatever this module says.

pub mod app_state;
pub mod event;
pub mod status;

pub use app_state::{AppState, Focus, Mode};
pub use event::UiEvent;
pub use status::{StatusKind, StatusLine};

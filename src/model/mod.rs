//! Domain model types (pure).

pub mod error;
pub mod key;

pub use error::{AppError, ExportError, StoreError};
pub use key::Key;

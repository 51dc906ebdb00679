//! Error types for the ldbv application.
//!
//! The taxonomy mirrors the error-handling design: store-open failures at
//! startup are fatal; iterator, lookup, and export failures are reportable
//! through the status line while the session keeps its last valid state; the
//! value renderer is total and has no error channel at all.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// Everything that can end the process funnels through here. Domain errors
/// (`StoreError`, `ExportError`) convert via `From` so call sites compose
/// with `?`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store access failure (open, iterator, or point lookup).
    ///
    /// Fatal only when it happens while opening the database at startup;
    /// during a session scan errors are caught earlier and reported on the
    /// status line instead of propagating here.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Export to disk failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber setup failed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or TUI rendering error (crossterm/ratatui layer).
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors surfaced by the ordered key-value store collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The database directory could not be opened.
    ///
    /// Raised at startup; the process exits with this message on stderr.
    #[error("Cannot open database at {path}: {reason}")]
    Open {
        /// Database directory that failed to open.
        path: PathBuf,
        /// Backend error text.
        reason: String,
    },

    /// Creating or advancing a store iterator failed.
    ///
    /// Reportable: the pager keeps any keys already collected in the current
    /// page segment and the session continues.
    #[error("Iterator error: {0}")]
    Iterator(String),

    /// A point lookup failed for a reason other than the key being absent.
    #[error("Lookup failed for key '{key}': {reason}")]
    Lookup {
        /// Lossy display form of the key.
        key: String,
        /// Backend error text.
        reason: String,
    },
}

/// Errors from the export subsystem.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem failure creating the dump directory or writing a file.
    ///
    /// For an aggregate dump the partially written file is left on disk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The selected key has no value in the store.
    #[error("Key not found: {key}")]
    MissingKey {
        /// Lossy display form of the key.
        key: String,
    },

    /// Store access failed during export.
    #[error("Store error during export: {0}")]
    Store(#[from] StoreError),

    /// Whole-store dump aborted mid-iteration.
    ///
    /// Carries how many entries made it to disk before the iterator failed.
    #[error("Dump aborted after {exported} entries: {source}")]
    Interrupted {
        /// Entries written before the failure.
        exported: usize,
        /// The iterator error that stopped the dump.
        #[source]
        source: StoreError,
    },
}

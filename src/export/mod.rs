//! Export entries to text files.
//!
//! Two shapes, both reusing the value renderer so files show exactly what
//! the value pane shows: one `<sanitized-key>.txt` per single-entry export,
//! and an `all_keys.txt` aggregate with entries separated by a rule line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::{ExportError, Key};
use crate::render::render_value;
use crate::store::{Store, StoreIter};

/// Default output directory, relative to the working directory.
pub const DEFAULT_DUMP_DIR: &str = "leveldb_dump";

/// Aggregate dump file name.
pub const ALL_KEYS_FILE: &str = "all_keys.txt";

const RULE_LINE: &str =
    "--------------------------------------------------------------------------------";

/// Outcome of a whole-store dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpReport {
    /// Number of entries written.
    pub exported: usize,
    /// The aggregate file that was written.
    pub path: PathBuf,
}

/// Writes store entries into a fixed output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Exporter writing into `dir` (created on first use).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export one entry to `<sanitized-key>.txt`. Returns the file path.
    pub fn dump_one<S: Store>(&self, store: &mut S, key: &Key) -> Result<PathBuf, ExportError> {
        let value = store
            .get(key.as_bytes())?
            .ok_or_else(|| ExportError::MissingKey {
                key: key.display(),
            })?;

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.txt", sanitize_key(key.as_bytes())));
        fs::write(&path, format_entry(key, &value))?;
        info!(path = %path.display(), "dumped single entry");
        Ok(path)
    }

    /// Export every entry in store order, ignoring any active filter.
    ///
    /// Iterator errors abort the dump and report how many entries made it
    /// out; on any failure the partial file is left on disk.
    pub fn dump_all<S: Store>(&self, store: &mut S) -> Result<DumpReport, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(ALL_KEYS_FILE);
        let mut out = BufWriter::new(File::create(&path)?);

        let mut iter = store.iter()?;
        let mut exported = 0usize;
        while iter.advance() {
            let key = Key::copy_from(iter.key());
            write!(out, "{}\n\n{}\n", format_entry(&key, iter.value()), RULE_LINE)?;
            exported += 1;
        }
        if let Some(source) = iter.error() {
            // Flush what we have; the partial file stays on disk.
            let _ = out.flush();
            return Err(ExportError::Interrupted { exported, source });
        }
        out.flush()?;
        info!(exported, path = %path.display(), "dumped all entries");
        Ok(DumpReport { exported, path })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_DUMP_DIR)
    }
}

/// Shared entry layout for the value pane and both export shapes.
pub fn format_entry(key: &Key, value: &[u8]) -> String {
    format!("Key: {}\n\nValue: {}", key.display(), render_value(value))
}

/// Replace filesystem-hostile characters with `_`.
///
/// Control characters and `/ \ : * ? " < > |` are forbidden; the key is
/// decoded lossily first, so invalid bytes surface as U+FFFD rather than
/// escaping into the filename raw.
pub fn sanitize_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key)
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

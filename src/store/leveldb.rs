//! LevelDB backend over `rusty-leveldb`.

use std::path::{Path, PathBuf};

use rusty_leveldb::{LdbIterator, Options, DB};
use tracing::debug;

use super::{Store, StoreIter};
use crate::model::StoreError;

/// Production store backend: a LevelDB database directory.
pub struct LevelDbStore {
    db: DB,
    path: PathBuf,
}

impl LevelDbStore {
    /// Open an existing database directory.
    ///
    /// `create_if_missing` is off: this is a viewer, pointing it at a
    /// directory that is not a LevelDB database must fail, not create one.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing = false;
        let db = DB::open(path, opts).map_err(|status| StoreError::Open {
            path: path.to_path_buf(),
            reason: status.to_string(),
        })?;
        debug!(path = %path.display(), "opened leveldb database");
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Database directory this store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for LevelDbStore {
    type Iter = LevelDbIter;

    fn iter(&mut self) -> Result<Self::Iter, StoreError> {
        let inner = self
            .db
            .new_iter()
            .map_err(|status| StoreError::Iterator(status.to_string()))?;
        Ok(LevelDbIter {
            inner,
            key: Vec::new(),
            value: Vec::new(),
            valid: false,
            done: false,
        })
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key))
    }
}

/// Iterator over a [`LevelDbStore`].
///
/// `rusty-leveldb` copies the current entry out on request; we keep the
/// copies in `key`/`value` so the trait can hand out borrows.
pub struct LevelDbIter {
    inner: rusty_leveldb::DBIterator,
    key: Vec<u8>,
    value: Vec<u8>,
    valid: bool,
    /// Latched on exhaustion. The backend treats an invalid iterator like a
    /// reset one, so an unguarded advance past the end would wrap to the
    /// first entry.
    done: bool,
}

impl LevelDbIter {
    fn refresh_current(&mut self) {
        self.valid = self.inner.current(&mut self.key, &mut self.value);
    }
}

impl StoreIter for LevelDbIter {
    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.inner.advance() {
            self.refresh_current();
        } else {
            self.valid = false;
            self.done = true;
        }
        self.valid
    }

    fn valid(&self) -> bool {
        self.valid
    }

    fn seek(&mut self, target: &[u8]) {
        self.inner.seek(target);
        if self.inner.valid() {
            self.refresh_current();
            self.done = false;
        } else {
            self.valid = false;
            self.done = true;
        }
    }

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn value(&self) -> &[u8] {
        &self.value
    }

    fn error(&self) -> Option<StoreError> {
        // rusty-leveldb folds iteration errors into exhaustion; there is no
        // post-scan status to query on DBIterator.
        None
    }
}

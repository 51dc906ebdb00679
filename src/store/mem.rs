//! In-memory store backend.
//!
//! Backs unit and acceptance tests, and doubles as a fault injector: the
//! pager's iterator-error path is only reachable through
//! [`MemStore::fail_iteration_after`].

use std::collections::BTreeMap;

use super::{Store, StoreIter};
use crate::model::StoreError;

/// Ordered in-memory store over a `BTreeMap`.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    fail_after: Option<usize>,
}

impl MemStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut store = Self::new();
        for (k, v) in pairs {
            store.insert(k.as_ref(), v.as_ref());
        }
        store
    }

    /// Insert an entry (test setup only; the application never writes).
    pub fn insert(&mut self, key: &[u8], value: &[u8]) {
        self.entries.insert(key.to_vec(), value.to_vec());
    }

    /// Make every iterator produced from now on fail after `steps`
    /// successful advances.
    pub fn fail_iteration_after(&mut self, steps: usize) {
        self.fail_after = Some(steps);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemStore {
    type Iter = MemIter;

    fn iter(&mut self) -> Result<Self::Iter, StoreError> {
        Ok(MemIter {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            cursor: Cursor::Start,
            steps: 0,
            fail_after: self.fail_after,
            failed: false,
        })
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

/// Snapshot iterator over a [`MemStore`].
pub struct MemIter {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    cursor: Cursor,
    steps: usize,
    fail_after: Option<usize>,
    failed: bool,
}

/// Iterator position. `Start` and `Done` are distinct: an exhausted
/// iterator must never restart from the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Start,
    At(usize),
    Done,
}

impl MemIter {
    fn step_budget_exhausted(&mut self) -> bool {
        if let Some(limit) = self.fail_after {
            if self.steps >= limit {
                self.failed = true;
                return true;
            }
        }
        self.steps += 1;
        false
    }
}

impl StoreIter for MemIter {
    fn advance(&mut self) -> bool {
        if self.failed || self.cursor == Cursor::Done {
            return false;
        }
        if self.step_budget_exhausted() {
            self.cursor = Cursor::Done;
            return false;
        }
        let next = match self.cursor {
            Cursor::Start => 0,
            Cursor::At(i) => i + 1,
            Cursor::Done => unreachable!(),
        };
        if next < self.entries.len() {
            self.cursor = Cursor::At(next);
            true
        } else {
            self.cursor = Cursor::Done;
            false
        }
    }

    fn valid(&self) -> bool {
        matches!(self.cursor, Cursor::At(_))
    }

    fn seek(&mut self, target: &[u8]) {
        if self.failed {
            self.cursor = Cursor::Done;
            return;
        }
        self.cursor = match self
            .entries
            .iter()
            .position(|(k, _)| k.as_slice() >= target)
        {
            Some(i) => Cursor::At(i),
            None => Cursor::Done,
        };
    }

    fn key(&self) -> &[u8] {
        match self.cursor {
            Cursor::At(i) => self.entries[i].0.as_slice(),
            _ => &[],
        }
    }

    fn value(&self) -> &[u8] {
        match self.cursor {
            Cursor::At(i) => self.entries[i].1.as_slice(),
            _ => &[],
        }
    }

    fn error(&self) -> Option<StoreError> {
        self.failed
            .then(|| StoreError::Iterator("injected iteration failure".to_string()))
    }
}

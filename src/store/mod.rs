//! Ordered key-value store collaborator seam.
//!
//! The rest of the application only sees these two traits. The production
//! backend is [`LevelDbStore`] over `rusty-leveldb`; [`MemStore`] is an
//! in-memory backend used heavily by tests (it can inject iterator errors,
//! which the LevelDB backend cannot do on demand).

mod leveldb;
mod mem;

pub use leveldb::LevelDbStore;
pub use mem::MemStore;

use crate::model::StoreError;

/// Read-only ordered key-value store.
///
/// Methods take `&mut self` because the LevelDB backend requires it; there
/// is exactly one reader and no mutation in this application, so the
/// exclusivity costs nothing.
pub trait Store {
    /// Concrete iterator type produced by [`Store::iter`].
    type Iter: StoreIter;

    /// Open a fresh full-range ascending iterator.
    ///
    /// The iterator starts positioned *before* the first key; call
    /// [`StoreIter::advance`] to reach it. Iterators are meant to be scoped
    /// to one scan and dropped when it ends.
    fn iter(&mut self) -> Result<Self::Iter, StoreError>;

    /// Point lookup. `Ok(None)` means the key is absent.
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Forward iterator over a [`Store`].
///
/// `key()`/`value()` borrow the iterator's internal buffers, which are only
/// valid until the next `advance` or `seek`; callers copy what they keep.
pub trait StoreIter {
    /// Step to the next entry. Returns `false` once exhausted (or after an
    /// iteration error; see [`StoreIter::error`]).
    fn advance(&mut self) -> bool;

    /// Whether the iterator is positioned on an entry.
    fn valid(&self) -> bool;

    /// Position on the first entry with key `>= target`. Leaves the
    /// iterator invalid when no such entry exists.
    fn seek(&mut self, target: &[u8]);

    /// Current key bytes. Only meaningful while `valid()`.
    fn key(&self) -> &[u8];

    /// Current value bytes. Only meaningful while `valid()`.
    fn value(&self) -> &[u8];

    /// Error channel, checked after a scan ends.
    ///
    /// A failed iterator looks exhausted to `advance`; this distinguishes
    /// "done" from "broke".
    fn error(&self) -> Option<StoreError>;
}

//! Paginated iteration over the store.
//!
//! The pager walks a scoped store iterator, applies the [`FilterSpec`], and
//! assembles fixed-size pages of matching keys. It owns the "more data
//! available" signal and the forward-resume cursor (the last key collected).
//!
//! One deliberate looseness is preserved from the tool this replaces: after
//! collecting a page segment, "more available" is decided by probing one raw
//! iterator step, **not** by looking ahead to the next *matching* key. Under
//! a sparse filter this can report more data when no further key matches; the
//! resulting `extend` call then appends nothing and returns `false`.

mod filter;

pub use filter::FilterSpec;

use tracing::debug;

use crate::model::{Key, StoreError};
use crate::store::{Store, StoreIter};

/// Default number of keys per page segment.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Stateful paging engine over an ordered store.
///
/// Holds the current filter epoch: the filter itself, every key collected so
/// far (strictly increasing in store order, no duplicates), and the "more
/// available" flag. Changing the filter via [`Pager::reset`] discards
/// everything and restarts from the smallest key.
#[derive(Debug, Clone)]
pub struct Pager {
    filter: FilterSpec,
    keys: Vec<Key>,
    more: bool,
    page_size: usize,
}

impl Pager {
    /// New pager with the given page size and an empty filter. No page is
    /// loaded until [`Pager::reset`] runs.
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: FilterSpec::default(),
            keys: Vec::new(),
            more: false,
            page_size: page_size.max(1),
        }
    }

    /// Keys collected in the current filter epoch, in store order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys collected so far.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been collected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The active filter.
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Whether the store may hold further keys past the resume cursor.
    ///
    /// Loose by design: see the module docs.
    pub fn has_more(&self) -> bool {
        self.more
    }

    /// Configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Discard the current page, install `spec`, and load the first page.
    ///
    /// On an iterator error the keys collected before the failure remain
    /// valid and stay in the page.
    pub fn reset<S: Store>(&mut self, store: &mut S, spec: FilterSpec) -> Result<(), StoreError> {
        self.keys.clear();
        self.more = false;
        self.filter = spec;
        self.load_first_page(store)
    }

    fn load_first_page<S: Store>(&mut self, store: &mut S) -> Result<(), StoreError> {
        let mut iter = store.iter()?;
        while self.keys.len() < self.page_size && iter.advance() {
            if self.filter.matches(iter.key()) {
                self.keys.push(Key::copy_from(iter.key()));
            }
        }
        // Raw one-step probe; intentionally not gated on the filter.
        self.more = iter.advance();
        debug!(
            loaded = self.keys.len(),
            more = self.more,
            filter = self.filter.raw(),
            "loaded first page"
        );
        if let Some(err) = iter.error() {
            return Err(err);
        }
        Ok(())
    }

    /// Append up to one more page of matches, resuming past the last
    /// collected key. Returns whether at least one key was appended.
    ///
    /// No-op returning `Ok(false)` unless `has_more()` and the page is
    /// non-empty. Iterator errors surface as `Err` but keys appended before
    /// the failure are kept.
    pub fn extend<S: Store>(&mut self, store: &mut S) -> Result<bool, StoreError> {
        if !self.more || self.keys.is_empty() {
            return Ok(false);
        }
        let resume = self.keys[self.keys.len() - 1].clone();

        let mut iter = store.iter()?;
        iter.seek(resume.as_bytes());
        if !iter.valid() {
            return Ok(false);
        }

        // The seek lands on the resume key itself; the loop's first advance
        // steps past it so the key is never returned twice.
        let target = self.keys.len() + self.page_size;
        let mut appended = 0usize;
        while self.keys.len() < target && iter.advance() {
            if self.filter.matches(iter.key()) {
                self.keys.push(Key::copy_from(iter.key()));
                appended += 1;
            }
        }
        self.more = iter.advance();
        debug!(appended, total = self.keys.len(), more = self.more, "extended page");
        if let Some(err) = iter.error() {
            return Err(err);
        }
        Ok(appended > 0)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

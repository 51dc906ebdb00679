//! Key filter predicate.

/// Case-insensitive substring filter over candidate keys.
///
/// The lowercased needle is computed once at construction; `matches` is then
/// a pure predicate called once per key scanned, so a page extension costs
/// O(keys scanned), not O(page size).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    raw: String,
    needle: String,
}

impl FilterSpec {
    /// Build a filter from the raw search text. Empty text matches all keys.
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let needle = raw.to_lowercase();
        Self { raw, needle }
    }

    /// The text as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether this filter matches every key.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Whether `key` passes the filter.
    ///
    /// Keys are compared through their lossy UTF-8 decoding, lowercased, so
    /// binary keys still participate (their printable portions match).
    pub fn matches(&self, key: &[u8]) -> bool {
        if self.raw.is_empty() {
            return true;
        }
        String::from_utf8_lossy(key)
            .to_lowercase()
            .contains(&self.needle)
    }
}

//! Path-based navigation history.
//!
//! # Responsibilities
//! - Keep the stack of visited locations and the cursor into it
//! - Push (dropping forward entries), replace, and traverse by delta
//! - Translate between application paths and base-prefixed hrefs
//!
//! # Design Decisions
//! - Path based, never hash based: hrefs look like `/news/article/7`
//! - Out-of-range traversal is a no-op, as in a browser
//! - Entries carry monotonically increasing keys

use crate::routing::location::{join_base, normalize_base, Location};

/// A stack of navigable locations with back/forward traversal.
pub trait History: Send + Sync + std::fmt::Debug {
    /// The location under the cursor.
    fn location(&self) -> &Location;

    /// Add a new entry after the cursor, discarding forward entries.
    fn push(&mut self, location: Location);

    /// Overwrite the entry under the cursor.
    fn replace(&mut self, location: Location);

    /// Move the cursor by `delta`. Returns `None` and stays put when the
    /// target is out of range.
    fn go(&mut self, delta: isize) -> Option<&Location>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// True when there are no entries. A history always holds its start
    /// entry, so implementations backed by a stack never report empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor index into the entries.
    fn position(&self) -> usize;

    /// Normalized base prefix (empty for `/`).
    fn base(&self) -> &str;

    /// Href for a location, with the base prepended.
    fn create_href(&self, location: &Location) -> String {
        join_base(self.base(), &location.full_path())
    }
}

/// A single history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub key: u64,
    pub location: Location,
}

/// In-process history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    base: String,
    entries: Vec<HistoryEntry>,
    position: usize,
    next_key: u64,
}

impl MemoryHistory {
    /// History rooted at `/` with no base.
    pub fn new() -> Self {
        Self::with_base("/", Location::new("/"))
    }

    /// History starting at `initial`.
    pub fn starting_at(initial: Location) -> Self {
        Self::with_base("/", initial)
    }

    /// History mounted under `base`, starting at `initial`.
    pub fn with_base(base: &str, initial: Location) -> Self {
        Self {
            base: normalize_base(base),
            entries: vec![HistoryEntry {
                key: 0,
                location: initial,
            }],
            position: 0,
            next_key: 1,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Key of the entry under the cursor.
    pub fn current_key(&self) -> u64 {
        self.entries[self.position].key
    }

    fn take_key(&mut self) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &Location {
        &self.entries[self.position].location
    }

    fn push(&mut self, location: Location) {
        let key = self.take_key();
        self.entries.truncate(self.position + 1);
        self.entries.push(HistoryEntry { key, location });
        self.position = self.entries.len() - 1;
    }

    fn replace(&mut self, location: Location) {
        let key = self.take_key();
        self.entries[self.position] = HistoryEntry { key, location };
    }

    fn go(&mut self, delta: isize) -> Option<&Location> {
        let target = self.position.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.position = target;
        Some(&self.entries[target].location)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn base(&self) -> &str {
        &self.base
    }
}

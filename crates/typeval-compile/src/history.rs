//! Active-path tracking for cycle detection.
//!
//! A key is present exactly while a frame that entered it is on the call
//! stack. Entries are counted, so entering the same key twice nests and each
//! [`HistoryGuard`] releases only what it entered.

use core::ops::{Deref, DerefMut};

use ahash::AHashMap;
use typeval_types::TypeId;

/// Identity of a type on the active path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryKey {
    Named(String),
    /// An unnamed type that can still reach itself, keyed by host identity.
    Type(TypeId),
    /// Shared marker for anonymous types and non-type scopes.
    Anonymous,
}

impl HistoryKey {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) => HistoryKey::Named(name.to_string()),
            None => HistoryKey::Anonymous,
        }
    }

    /// The display name when there is one, otherwise the type's own id.
    pub fn of(name: Option<&str>, ty: TypeId) -> Self {
        match name {
            Some(name) => HistoryKey::Named(name.to_string()),
            None => HistoryKey::Type(ty),
        }
    }
}

#[derive(Debug, Default)]
pub struct History {
    active: AHashMap<HistoryKey, usize>,
    depth: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// No frame has entered anything, i.e. the current frame is outermost.
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Number of entries currently held, counting repeats.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn contains(&self, key: &HistoryKey) -> bool {
        self.active.contains_key(key)
    }

    pub fn enter(&mut self, key: HistoryKey) -> HistoryGuard<'_> {
        self.enter_many([key])
    }

    pub fn enter_many(&mut self, keys: impl IntoIterator<Item = HistoryKey>) -> HistoryGuard<'_> {
        let keys: Vec<HistoryKey> = keys.into_iter().collect();
        for key in &keys {
            *self.active.entry(key.clone()).or_insert(0) += 1;
            self.depth += 1;
        }
        HistoryGuard {
            history: self,
            keys,
        }
    }

    fn release(&mut self, key: &HistoryKey) {
        if let Some(count) = self.active.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.active.remove(key);
            }
            self.depth -= 1;
        }
    }
}

/// Releases its keys when dropped, on every exit path.
#[derive(Debug)]
pub struct HistoryGuard<'a> {
    history: &'a mut History,
    keys: Vec<HistoryKey>,
}

impl Deref for HistoryGuard<'_> {
    type Target = History;

    fn deref(&self) -> &History {
        self.history
    }
}

impl DerefMut for HistoryGuard<'_> {
    fn deref_mut(&mut self) -> &mut History {
        self.history
    }
}

impl Drop for HistoryGuard<'_> {
    fn drop(&mut self) {
        for key in self.keys.drain(..) {
            self.history.release(&key);
        }
    }
}

//! Key interning for unit, file, and package keys.
//!
//! Uses `lasso::ThreadedRodeo` so keys can be interned from decoder threads.

use lasso::{Spur, ThreadedRodeo};

/// Key interner that normalizes separators before interning.
///
/// Backslashes become forward slashes, repeated slashes collapse, and a
/// trailing slash is dropped, so `tags\impl\` and `tags/impl` are one key.
pub struct KeyInterner {
    inner: ThreadedRodeo,
}

impl KeyInterner {
    /// Create a new key interner.
    pub fn new() -> Self {
        Self {
            inner: ThreadedRodeo::default(),
        }
    }

    /// Intern a key, normalizing separators first.
    pub fn intern(&self, key: &str) -> Spur {
        let normalized = Self::normalize(key);
        self.inner.get_or_intern(normalized)
    }

    /// Look up a previously interned key without inserting.
    pub fn get(&self, key: &str) -> Option<Spur> {
        let normalized = Self::normalize(key);
        self.inner.get(normalized)
    }

    /// Resolve a `Spur` back to its string.
    pub fn resolve(&self, key: &Spur) -> &str {
        self.inner.resolve(key)
    }

    /// Number of distinct keys interned so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn normalize(key: &str) -> String {
        let mut result = key.replace('\\', "/");
        while result.contains("//") {
            result = result.replace("//", "/");
        }
        if result.len() > 1 && result.ends_with('/') {
            result.pop();
        }
        result
    }
}

impl Default for KeyInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyInterner")
            .field("len", &self.inner.len())
            .finish()
    }
}

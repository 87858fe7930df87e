//! Interned symbols for cheap cloning and O(1) equality comparison.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned name, descriptor, or type tag.
///
/// Symbols are interned strings represented as a `u32` index into a
/// session-wide string interner. This provides O(1) equality comparison and
/// O(1) cloning, and makes symbol-keyed maps cheap. A `Symbol` is only
/// meaningful together with the [`Interner`] that produced it; interner
/// indices are not stable across build sessions, so persisted records store
/// the underlying strings and re-intern on read.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a `Symbol` from a raw `u32` index.
    ///
    /// This is primarily intended for deserialization and testing.
    /// In normal use, symbols should be created through [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this symbol.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Symbol` wraps a `u32` which is always a valid `usize` on 32-bit
// and 64-bit platforms. `try_from_usize` rejects values that don't fit in `u32`.
unsafe impl lasso::Key for Symbol {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Symbol)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// All member names, class names, and descriptor strings are interned for
/// the duration of one build session. Concurrent `get_or_intern` calls for
/// the same string converge to a single canonical [`Symbol`]; a race
/// inserting the same raw name from two threads has at most one winner.
pub struct Interner {
    rodeo: ThreadedRodeo<Symbol>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string, returning its [`Symbol`]. If the string was already
    /// interned, returns the existing symbol without allocating.
    pub fn get_or_intern(&self, s: &str) -> Symbol {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves a [`Symbol`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Symbol` was not created by this interner.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.rodeo.resolve(&sym)
    }

    /// Returns the number of interned strings.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_resolve_roundtrip() {
        let interner = Interner::new();
        let id = interner.get_or_intern("java/lang/String");
        assert_eq!(interner.resolve(id), "java/lang/String");
    }

    #[test]
    fn same_string_same_symbol() {
        let interner = Interner::new();
        let a = interner.get_or_intern("foo");
        let b = interner.get_or_intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn different_strings_different_symbols() {
        let interner = Interner::new();
        let a = interner.get_or_intern("foo");
        let b = interner.get_or_intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn concurrent_intern_converges() {
        let interner = std::sync::Arc::new(Interner::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let interner = interner.clone();
            handles.push(std::thread::spawn(move || {
                interner.get_or_intern("com/example/Widget")
            }));
        }
        let syms: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(syms.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn serde_roundtrip() {
        let id = Symbol::from_raw(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}

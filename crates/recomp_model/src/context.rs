//! The explicit per-session interning context.

use recomp_common::{Interner, Symbol};

/// Session-wide state mapping raw names to interned [`Symbol`]s.
///
/// The context is an explicit value passed by reference to every
/// construction call that interns, never a hidden global. Its lifetime is
/// one build session (or one index); a full rebuild starts from a fresh
/// context. Interned symbols are only meaningful relative to the context
/// that produced them, which is why persisted records store raw strings
/// and re-intern on read.
///
/// The underlying interner is thread-safe: signature construction for
/// independent units may intern concurrently, and racing inserts of the
/// same raw name converge to one canonical symbol.
pub struct DependencyContext {
    interner: Interner,
}

impl DependencyContext {
    /// Creates a fresh context with an empty symbol table.
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
        }
    }

    /// Interns a raw name, returning its canonical [`Symbol`].
    pub fn symbol(&self, raw: &str) -> Symbol {
        self.interner.get_or_intern(raw)
    }

    /// Resolves a [`Symbol`] back to the raw name it was interned from.
    ///
    /// # Panics
    ///
    /// Panics if the symbol was produced by a different context.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Returns the number of distinct interned names.
    pub fn symbol_count(&self) -> usize {
        self.interner.len()
    }
}

impl Default for DependencyContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_canonical() {
        let ctx = DependencyContext::new();
        let a = ctx.symbol("com/example/Foo");
        let b = ctx.symbol("com/example/Foo");
        assert_eq!(a, b);
        assert_eq!(ctx.resolve(a), "com/example/Foo");
    }

    #[test]
    fn fresh_context_is_empty() {
        let ctx = DependencyContext::new();
        assert_eq!(ctx.symbol_count(), 0);
    }
}

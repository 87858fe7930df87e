//! Set-deltas between two versions of an unordered collection.

use std::collections::HashSet;
use std::hash::Hash;

/// The delta between two versions of a set: what was added, what was
/// removed, and nothing else.
///
/// `unchanged()` is true iff both sides of the symmetric difference are
/// empty, i.e. the sets were equal.
#[derive(Clone, Debug)]
pub struct Specifier<T> {
    added: HashSet<T>,
    removed: HashSet<T>,
}

// Manual impls: comparing the `HashSet` fields needs `T: Eq + Hash`,
// which derived bounds would not supply.
impl<T: Eq + Hash> PartialEq for Specifier<T> {
    fn eq(&self, other: &Self) -> bool {
        self.added == other.added && self.removed == other.removed
    }
}

impl<T: Eq + Hash> Eq for Specifier<T> {}

impl<T: Eq + Hash + Clone> Specifier<T> {
    /// Computes the delta from `past` to `now`.
    pub fn between(past: &HashSet<T>, now: &HashSet<T>) -> Self {
        Self {
            added: now.difference(past).cloned().collect(),
            removed: past.difference(now).cloned().collect(),
        }
    }

    /// An empty delta (both sets equal).
    pub fn unchanged_delta() -> Self {
        Self {
            added: HashSet::new(),
            removed: HashSet::new(),
        }
    }

    /// Elements present now but not in the past.
    pub fn added(&self) -> &HashSet<T> {
        &self.added
    }

    /// Elements present in the past but not now.
    pub fn removed(&self) -> &HashSet<T> {
        &self.removed
    }

    /// Returns `true` iff the two sets were equal.
    pub fn unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<T: Eq + Hash + Clone> Default for Specifier<T> {
    fn default() -> Self {
        Self::unchanged_delta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn equal_sets_are_unchanged() {
        let s = Specifier::between(&set(&["a", "b"]), &set(&["b", "a"]));
        assert!(s.unchanged());
        assert!(s.added().is_empty());
        assert!(s.removed().is_empty());
    }

    #[test]
    fn added_and_removed_split_by_direction() {
        let s = Specifier::between(&set(&["a", "b"]), &set(&["b", "c"]));
        assert!(!s.unchanged());
        assert_eq!(s.added(), &set(&["c"]));
        assert_eq!(s.removed(), &set(&["a"]));
    }

    #[test]
    fn empty_to_nonempty() {
        let s = Specifier::between(&set(&[]), &set(&["x"]));
        assert_eq!(s.added(), &set(&["x"]));
        assert!(s.removed().is_empty());
    }

    #[test]
    fn deltas_compare_by_both_sides() {
        let a = Specifier::between(&set(&["a"]), &set(&["b"]));
        let b = Specifier::between(&set(&["a"]), &set(&["b"]));
        let c = Specifier::between(&set(&["a"]), &set(&["c"]));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn nonempty_to_empty() {
        let s = Specifier::between(&set(&["x"]), &set(&[]));
        assert!(s.added().is_empty());
        assert_eq!(s.removed(), &set(&["x"]));
    }
}

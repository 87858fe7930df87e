//! Usage entries and per-unit usage clusters.
//!
//! A [`Usage`] records the fact that some compiled unit references a
//! class, field, or method of another unit. Each unit owns exactly one
//! [`UsageCluster`] — the set of usages that unit makes — which is part of
//! its persisted record and is the source the reverse index is built from.

use std::collections::{hash_set, HashSet};

use recomp_common::Symbol;

/// A single recorded reference from a compiled unit to a signature element.
///
/// Field and method usages identify the target by owner class, member
/// name, and descriptor string; for methods the descriptor is the
/// canonical overload key `(<arg descriptors>)<return descriptor>`, so an
/// overload set maps to distinct usage keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Usage {
    /// A reference to a class as a whole (extends, implements, field or
    /// signature type, thrown exception).
    Class {
        /// Interned internal name of the referenced class.
        class: Symbol,
    },
    /// A reference to a field.
    Field {
        /// Interned internal name of the class declaring the field.
        owner: Symbol,
        /// Interned field name.
        name: Symbol,
        /// Interned field type descriptor.
        descr: Symbol,
    },
    /// A reference to a method.
    Method {
        /// Interned internal name of the class declaring the method.
        owner: Symbol,
        /// Interned method name.
        name: Symbol,
        /// Interned overload key `(<args>)<ret>`.
        descr: Symbol,
    },
}

/// The set of usages one compiled unit makes.
///
/// Insertion is idempotent (set semantics). The cluster is owned by the
/// unit's persisted record and replaced wholesale when the unit is
/// recompiled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageCluster {
    usages: HashSet<Usage>,
}

impl UsageCluster {
    /// Creates an empty cluster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a usage; adding one that is already present is a no-op.
    pub fn add(&mut self, usage: Usage) {
        self.usages.insert(usage);
    }

    /// Returns `true` if the cluster records the given usage.
    pub fn contains(&self, usage: &Usage) -> bool {
        self.usages.contains(usage)
    }

    /// Iterates over the recorded usages in arbitrary order.
    pub fn iter(&self) -> hash_set::Iter<'_, Usage> {
        self.usages.iter()
    }

    /// Returns the number of distinct usages.
    pub fn len(&self) -> usize {
        self.usages.len()
    }

    /// Returns `true` if no usages are recorded.
    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }
}

impl<'a> IntoIterator for &'a UsageCluster {
    type Item = &'a Usage;
    type IntoIter = hash_set::Iter<'a, Usage>;

    fn into_iter(self) -> Self::IntoIter {
        self.usages.iter()
    }
}

impl FromIterator<Usage> for UsageCluster {
    fn from_iter<I: IntoIterator<Item = Usage>>(iter: I) -> Self {
        Self {
            usages: iter.into_iter().collect(),
        }
    }
}

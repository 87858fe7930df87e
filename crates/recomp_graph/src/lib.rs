//! Reverse index from usage keys to the compiled units that use them.
//!
//! The graph answers the scheduler's central question: given that a
//! signature element changed, which units referenced it and must be
//! reconsidered? Edges are recorded incrementally as units are processed;
//! a unit's whole edge set is replaced when the unit is recompiled, and a
//! full rebuild is available after persisted-state corruption.

#![warn(missing_docs)]

use std::collections::HashSet;

use dashmap::DashMap;
use recomp_common::Symbol;
use recomp_model::{Usage, UsageCluster};

/// Concurrent reverse index mapping each [`Usage`] to the set of units
/// that make it.
///
/// `record` is idempotent and safe under concurrent writers: writers
/// touching different unit keys proceed in parallel on separate shards,
/// while `replace_unit` serializes same-unit writers on the unit's
/// ownership entry. Stale edges are harmless — the consuming scheduler
/// re-validates — so no fine-grained deletion API exists beyond wholesale
/// per-unit replacement.
#[derive(Debug, Default)]
pub struct UsageGraph {
    /// usage key -> units making that usage.
    edges: DashMap<Usage, HashSet<Symbol>>,
    /// unit -> the usages it currently owns edges for.
    owned: DashMap<Symbol, HashSet<Usage>>,
}

impl UsageGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `unit` makes `usage`. Recording the same edge twice is
    /// a no-op.
    pub fn record(&self, usage: Usage, unit: Symbol) {
        self.owned.entry(unit).or_default().insert(usage);
        self.edges.entry(usage).or_default().insert(unit);
    }

    /// Returns the set of units recorded as making `usage`.
    pub fn query(&self, usage: &Usage) -> HashSet<Symbol> {
        self.edges
            .get(usage)
            .map(|units| units.clone())
            .unwrap_or_default()
    }

    /// Replaces `unit`'s entire edge set with the given cluster.
    ///
    /// Edges the unit no longer makes are removed; new ones are inserted.
    /// Concurrent `replace_unit` calls for the same unit serialize on the
    /// unit's ownership entry.
    pub fn replace_unit(&self, unit: Symbol, cluster: &UsageCluster) {
        let mut owned = self.owned.entry(unit).or_default();
        let new_usages: HashSet<Usage> = cluster.iter().copied().collect();

        for stale in owned.difference(&new_usages) {
            if let Some(mut units) = self.edges.get_mut(stale) {
                units.remove(&unit);
            }
        }
        for added in new_usages.difference(&*owned) {
            self.edges.entry(*added).or_default().insert(unit);
        }
        *owned = new_usages;
    }

    /// Discards all edges and rebuilds the graph from per-unit clusters.
    ///
    /// Used after persisted-state corruption forces a full reindex.
    pub fn rebuild<I>(&self, clusters: I)
    where
        I: IntoIterator<Item = (Symbol, UsageCluster)>,
    {
        self.edges.clear();
        self.owned.clear();
        for (unit, cluster) in clusters {
            for usage in &cluster {
                self.record(*usage, unit);
            }
        }
    }

    /// Returns the number of distinct usage keys with at least one edge.
    pub fn key_count(&self) -> usize {
        self.edges.len()
    }
}

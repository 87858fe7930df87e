//! What a processed build increment reports back to the orchestrator.

use std::collections::HashSet;

use recomp_common::Symbol;

/// The per-unit result of one build increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    /// The processed unit.
    pub unit: Symbol,
    /// Whether any dependency-relevant change was detected.
    pub changed: bool,
    /// Whether the unit was treated as fully changed — because it is new,
    /// its raw data failed to model, or no prior snapshot exists.
    pub fully_changed: bool,
    /// Units that referenced a changed signature element and must be
    /// reconsidered for recompilation.
    pub affected: HashSet<Symbol>,
}

/// The session-level result of one build increment.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// True when no prior snapshot was usable (missing or corrupt) and
    /// every unit was processed without history.
    pub full_rebuild: bool,
    /// Per-unit outcomes, in input order.
    pub units: Vec<UnitOutcome>,
}

impl BuildOutcome {
    /// Collects the union of all affected units across the increment.
    pub fn all_affected(&self) -> HashSet<Symbol> {
        let mut out = HashSet::new();
        for unit in &self.units {
            out.extend(unit.affected.iter().copied());
        }
        out
    }

    /// Returns `true` if no unit reported a dependency-relevant change.
    pub fn is_clean(&self) -> bool {
        self.units.iter().all(|u| !u.changed)
    }
}

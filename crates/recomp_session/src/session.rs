//! The build-session driver.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use recomp_common::Symbol;
use recomp_diff::Difference;
use recomp_graph::UsageGraph;
use recomp_model::{
    DependencyContext, MemberKey, MemberSignature, ModelError, Usage, UsageCluster,
};
use recomp_store::{Snapshot, SnapshotStore, StoreError, UnitRecord};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::input::{RawMember, RawUnit, RawUsage};
use crate::outcome::{BuildOutcome, UnitOutcome};

/// One build session over the persisted dependency index.
///
/// Owns the session's [`DependencyContext`], the usage graph rebuilt from
/// the prior snapshot, and the snapshot store. Signature construction for
/// independent units runs in parallel; graph and snapshot updates are
/// applied sequentially per unit, and the new snapshot replaces the old
/// one atomically at the end of each increment.
pub struct BuildSession {
    ctx: DependencyContext,
    config: SessionConfig,
    store: SnapshotStore,
    graph: UsageGraph,
    snapshot: Snapshot,
    full_rebuild: bool,
}

impl BuildSession {
    /// Opens a session against the configured snapshot directory.
    ///
    /// A missing snapshot starts an empty index; a corrupt one is
    /// discarded with a warning and forces a full reindex — partial trust
    /// in a damaged store is never an option.
    pub fn new(config: SessionConfig) -> Self {
        let ctx = DependencyContext::new();
        let store = SnapshotStore::new(&config.snapshot_dir);

        let (snapshot, full_rebuild) = match store.try_load(&ctx) {
            Ok(snapshot) => {
                debug!(units = snapshot.len(), "loaded dependency snapshot");
                (snapshot, false)
            }
            Err(StoreError::Io { .. }) => {
                debug!("no prior snapshot; starting empty index");
                (Snapshot::new(), true)
            }
            Err(err) => {
                warn!(error = %err, "snapshot unreadable, forcing full reindex");
                (Snapshot::new(), true)
            }
        };

        let graph = UsageGraph::new();
        graph.rebuild(snapshot.iter().map(|rec| (rec.unit, rec.usages.clone())));

        Self {
            ctx,
            config,
            store,
            graph,
            snapshot,
            full_rebuild,
        }
    }

    /// The session's interning context, for resolving outcome symbols.
    pub fn context(&self) -> &DependencyContext {
        &self.ctx
    }

    /// Returns `true` if this session started without usable prior state.
    pub fn is_full_rebuild(&self) -> bool {
        self.full_rebuild
    }

    /// Unwraps the output of an external collaborator, degrading to "no
    /// data available" on failure.
    ///
    /// The failure is logged; it never aborts the session.
    pub fn external_units(
        &self,
        result: Result<Vec<RawUnit>, SessionError>,
    ) -> Vec<RawUnit> {
        match result {
            Ok(units) => units,
            Err(err) => {
                warn!(error = %err, "external collaborator produced no usable output");
                Vec::new()
            }
        }
    }

    /// Processes one build increment and persists the updated snapshot.
    ///
    /// Each unit is diffed against its prior record; changed signature
    /// elements drive reverse-index queries to find affected dependents.
    /// A unit whose raw data fails to model is isolated: it is reported as
    /// fully changed and the session continues.
    pub fn process(&mut self, units: &[RawUnit]) -> Result<BuildOutcome, SessionError> {
        let ctx = &self.ctx;
        let built: Vec<Result<UnitRecord, ModelError>> = if self.config.parallel {
            units.par_iter().map(|unit| build_unit(ctx, unit)).collect()
        } else {
            units.iter().map(|unit| build_unit(ctx, unit)).collect()
        };

        let mut outcomes = Vec::with_capacity(units.len());
        for (raw, built) in units.iter().zip(built) {
            let unit_sym = self.ctx.symbol(&raw.name);
            let past = self.snapshot.unit(unit_sym).cloned();

            let outcome = match built {
                Ok(record) => self.apply_unit(unit_sym, past.as_ref(), record),
                Err(err) => {
                    warn!(unit = %raw.name, error = %err, "unit failed to model, treating as fully changed");
                    self.conservative_outcome(unit_sym, past.as_ref())
                }
            };
            debug!(
                unit = %raw.name,
                changed = outcome.changed,
                affected = outcome.affected.len(),
                "processed unit"
            );
            outcomes.push(outcome);
        }

        self.store.save(&self.ctx, &self.snapshot)?;
        info!(units = outcomes.len(), "snapshot replaced");

        Ok(BuildOutcome {
            full_rebuild: self.full_rebuild,
            units: outcomes,
        })
    }

    /// Diffs a freshly built record against its prior version and updates
    /// the index.
    fn apply_unit(
        &mut self,
        unit_sym: Symbol,
        past: Option<&UnitRecord>,
        record: UnitRecord,
    ) -> UnitOutcome {
        let changed_usages = match past {
            Some(past) => changed_usage_keys(&self.ctx, unit_sym, &past.members, &record.members),
            // No history: every declared member counts as newly added.
            None => changed_usage_keys(&self.ctx, unit_sym, &[], &record.members),
        };

        let affected = self.affected_by(unit_sym, &changed_usages);
        let changed = !changed_usages.is_empty() || past.is_none();

        self.graph.replace_unit(unit_sym, &record.usages);
        self.snapshot.insert(record);

        UnitOutcome {
            unit: unit_sym,
            changed,
            fully_changed: past.is_none(),
            affected,
        }
    }

    /// Outcome for a unit that could not be modeled: every usage key its
    /// previous signatures answered to is treated as changed, plus the
    /// class itself. Its prior record and edges are left in place — stale
    /// but harmless, and strictly more conservative than dropping them.
    fn conservative_outcome(
        &self,
        unit_sym: Symbol,
        past: Option<&UnitRecord>,
    ) -> UnitOutcome {
        let mut changed_usages: HashSet<Usage> = match past {
            Some(past) => past
                .members
                .iter()
                .map(|m| m.create_usage(&self.ctx, unit_sym))
                .collect(),
            None => HashSet::new(),
        };
        changed_usages.insert(Usage::Class { class: unit_sym });

        UnitOutcome {
            unit: unit_sym,
            changed: true,
            fully_changed: true,
            affected: self.affected_by(unit_sym, &changed_usages),
        }
    }

    fn affected_by(&self, unit_sym: Symbol, changed_usages: &HashSet<Usage>) -> HashSet<Symbol> {
        let mut affected = HashSet::new();
        for usage in changed_usages {
            affected.extend(self.graph.query(usage));
        }
        affected.remove(&unit_sym);
        affected
    }
}

/// Builds a unit's persisted record from its raw signature data.
///
/// The record carries the class signature itself, every declared member,
/// and the unit's usage cluster: explicit constant-pool references plus
/// the class usages implied by the unit's own signature types.
fn build_unit(ctx: &DependencyContext, raw: &RawUnit) -> Result<UnitRecord, ModelError> {
    let unit_sym = ctx.symbol(&raw.name);

    let mut members = Vec::with_capacity(raw.members.len() + 1);
    members.push(MemberSignature::class(
        ctx,
        raw.access,
        &raw.name,
        raw.superclass.as_deref(),
        &raw.interfaces,
    )?);

    for member in &raw.members {
        members.push(match member {
            RawMember::Field {
                access,
                name,
                descriptor,
                value,
            } => MemberSignature::field(ctx, *access, &raw.name, name, descriptor, value.clone())?,
            RawMember::Method {
                access,
                name,
                descriptor,
                exceptions,
                value,
            } => MemberSignature::method(
                ctx,
                *access,
                &raw.name,
                name,
                descriptor,
                exceptions,
                value.clone(),
            )?,
        });
    }

    let mut usages = UsageCluster::new();
    for member in &members {
        member.update_class_usages(&mut usages);
    }
    for usage in &raw.uses {
        usages.add(match usage {
            RawUsage::Class { class } => Usage::Class {
                class: ctx.symbol(class),
            },
            RawUsage::Field {
                owner,
                name,
                descriptor,
            } => Usage::Field {
                owner: ctx.symbol(owner),
                name: ctx.symbol(name),
                descr: ctx.symbol(descriptor),
            },
            RawUsage::Method {
                owner,
                name,
                descriptor,
            } => Usage::Method {
                owner: ctx.symbol(owner),
                name: ctx.symbol(name),
                descr: ctx.symbol(descriptor),
            },
        });
    }

    Ok(UnitRecord {
        unit: unit_sym,
        members,
        usages,
    })
}

/// Computes the set of usage keys whose answers may have changed between
/// two member lists of the same unit.
///
/// Members are paired by identity key; added and removed members
/// contribute their usage keys, and surviving pairs contribute theirs only
/// when the structural diff reports a dependency-relevant change.
fn changed_usage_keys(
    ctx: &DependencyContext,
    unit_sym: Symbol,
    past_members: &[MemberSignature],
    now_members: &[MemberSignature],
) -> HashSet<Usage> {
    let mut past_by_key: HashMap<MemberKey, &MemberSignature> =
        past_members.iter().map(|m| (m.key(), m)).collect();

    let mut changed = HashSet::new();
    for now in now_members {
        match past_by_key.remove(&now.key()) {
            Some(past) => {
                if !Difference::between(past, now).no() {
                    changed.insert(now.create_usage(ctx, unit_sym));
                }
            }
            None => {
                changed.insert(now.create_usage(ctx, unit_sym));
            }
        }
    }
    // Whatever is left was removed in this increment.
    for removed in past_by_key.values() {
        changed.insert(removed.create_usage(ctx, unit_sym));
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_members_produce_no_changed_keys() {
        let ctx = DependencyContext::new();
        let unit = ctx.symbol("com/example/Foo");
        let sig = MemberSignature::method(
            &ctx,
            0x0001,
            "com/example/Foo",
            "foo",
            "(I)V",
            &[],
            None,
        )
        .unwrap();
        let changed =
            changed_usage_keys(&ctx, unit, &[sig.clone()], &[sig]);
        assert!(changed.is_empty());
    }

    #[test]
    fn exception_change_produces_changed_key() {
        let ctx = DependencyContext::new();
        let unit = ctx.symbol("com/example/Foo");
        let past = MemberSignature::method(
            &ctx,
            0x0001,
            "com/example/Foo",
            "foo",
            "(I)V",
            &["java/io/IOException".to_string()],
            None,
        )
        .unwrap();
        let now =
            MemberSignature::method(&ctx, 0x0001, "com/example/Foo", "foo", "(I)V", &[], None)
                .unwrap();
        let changed = changed_usage_keys(&ctx, unit, &[past], &[now]);
        assert_eq!(changed.len(), 1);
        assert!(changed.contains(&Usage::Method {
            owner: unit,
            name: ctx.symbol("foo"),
            descr: ctx.symbol("(I)V"),
        }));
    }

    #[test]
    fn removed_member_produces_changed_key() {
        let ctx = DependencyContext::new();
        let unit = ctx.symbol("com/example/Foo");
        let past =
            MemberSignature::field(&ctx, 0x0001, "com/example/Foo", "count", "I", None).unwrap();
        let changed = changed_usage_keys(&ctx, unit, &[past], &[]);
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn build_unit_collects_signature_and_explicit_usages() {
        let ctx = DependencyContext::new();
        let mut raw = RawUnit::new("com/example/Foo");
        raw.members.push(RawMember::Method {
            access: 0x0001,
            name: "run".to_string(),
            descriptor: "()Ljava/lang/String;".to_string(),
            exceptions: vec![],
            value: None,
        });
        raw.uses.push(RawUsage::Method {
            owner: "com/example/Bar".to_string(),
            name: "helper".to_string(),
            descriptor: "()V".to_string(),
        });

        let record = build_unit(&ctx, &raw).unwrap();
        // Class signature + one method.
        assert_eq!(record.members.len(), 2);
        assert!(record.usages.contains(&Usage::Class {
            class: ctx.symbol("java/lang/String")
        }));
        assert!(record.usages.contains(&Usage::Method {
            owner: ctx.symbol("com/example/Bar"),
            name: ctx.symbol("helper"),
            descr: ctx.symbol("()V"),
        }));
    }

    #[test]
    fn build_unit_propagates_malformed_descriptor() {
        let ctx = DependencyContext::new();
        let mut raw = RawUnit::new("com/example/Broken");
        raw.members.push(RawMember::Field {
            access: 0x0001,
            name: "x".to_string(),
            descriptor: "Q".to_string(),
            value: None,
        });
        assert!(build_unit(&ctx, &raw).is_err());
    }
}

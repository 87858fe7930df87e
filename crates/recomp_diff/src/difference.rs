//! The change record between two versions of a member signature.

use recomp_model::{AccessFlags, MemberKind, MemberSignature, TypeRepr};

use crate::specifier::Specifier;

/// Modifier-bit changes split by direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifierDelta {
    /// Bits set now that were not set in the past.
    pub added: AccessFlags,
    /// Bits set in the past that are not set now.
    pub removed: AccessFlags,
}

impl ModifierDelta {
    /// Computes the symmetric difference of two modifier bitsets, split by
    /// direction.
    pub fn between(past: AccessFlags, now: AccessFlags) -> Self {
        Self {
            added: now - past,
            removed: past - now,
        }
    }

    /// Returns `true` if no modifier bit changed in either direction.
    pub fn is_none(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Kind-specific portion of a [`Difference`].
#[derive(Clone, Debug, PartialEq)]
pub enum KindDelta {
    /// Field diff; fields carry no extras beyond the shared proto delta.
    Field,
    /// Method diff extras.
    Method {
        /// Delta of the declared thrown-exception set.
        exceptions: Specifier<TypeRepr>,
    },
    /// Class diff extras.
    Class {
        /// Whether the direct superclass changed.
        superclass_changed: bool,
        /// Delta of the implemented-interface set.
        interfaces: Specifier<TypeRepr>,
    },
    /// The two signatures were not of the same kind. This never happens
    /// through keyed lookup; it is reported as a full change rather than
    /// trusted.
    KindChanged,
}

impl KindDelta {
    /// Returns `true` if the kind-specific portion reports no change.
    pub fn unchanged(&self) -> bool {
        match self {
            KindDelta::Field => true,
            KindDelta::Method { exceptions } => exceptions.unchanged(),
            KindDelta::Class {
                superclass_changed,
                interfaces,
            } => !superclass_changed && interfaces.unchanged(),
            KindDelta::KindChanged => false,
        }
    }
}

/// The computed structural delta between a past and a current signature of
/// the same member.
///
/// A plain immutable record built by the pure function
/// [`Difference::between`]; there is exactly one shape per member kind, so
/// no dynamic dispatch is involved.
#[derive(Clone, Debug, PartialEq)]
pub struct Difference {
    /// Modifier-bit delta.
    pub modifiers: ModifierDelta,
    /// A constant/default value is present now but was absent.
    pub value_added: bool,
    /// A constant/default value was present but is absent now.
    pub value_removed: bool,
    /// A constant/default value is present on both sides but its content
    /// differs. Dependents may have inlined the old value, so this counts
    /// as a change.
    pub value_changed: bool,
    /// The identity tuple itself differs (declared type changed under the
    /// same name, or the signatures were paired incorrectly). Always a
    /// change.
    pub identity_changed: bool,
    /// Kind-specific extras.
    pub kind: KindDelta,
}

impl Difference {
    /// Computes the delta from `past` to `now`.
    ///
    /// The two signatures are expected to have equal identity (the session
    /// pairs them by [`MemberKey`](recomp_model::MemberKey)); if they do
    /// not, the result still reports a change rather than panicking.
    pub fn between(past: &MemberSignature, now: &MemberSignature) -> Self {
        let kind = match (&past.kind, &now.kind) {
            (MemberKind::Field, MemberKind::Field) => KindDelta::Field,
            (
                MemberKind::Method {
                    exceptions: past_exc,
                    ..
                },
                MemberKind::Method {
                    exceptions: now_exc,
                    ..
                },
            ) => KindDelta::Method {
                exceptions: Specifier::between(past_exc, now_exc),
            },
            (
                MemberKind::Class {
                    superclass: past_sup,
                    interfaces: past_ifaces,
                },
                MemberKind::Class {
                    superclass: now_sup,
                    interfaces: now_ifaces,
                },
            ) => KindDelta::Class {
                superclass_changed: past_sup != now_sup,
                interfaces: Specifier::between(past_ifaces, now_ifaces),
            },
            _ => KindDelta::KindChanged,
        };

        Self {
            modifiers: ModifierDelta::between(past.access, now.access),
            value_added: now.has_value() && !past.has_value(),
            value_removed: !now.has_value() && past.has_value(),
            value_changed: match (&past.value, &now.value) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            },
            identity_changed: past.key() != now.key(),
            kind,
        }
    }

    /// Returns `true` iff nothing observable to dependents changed.
    ///
    /// This is the predicate the scheduler uses to decide whether the
    /// member's dependents need recompiling.
    pub fn no(&self) -> bool {
        self.modifiers.is_none()
            && !self.value_added
            && !self.value_removed
            && !self.value_changed
            && !self.identity_changed
            && self.kind.unchanged()
    }

    /// Returns the exception-set delta for method diffs, or an empty delta
    /// for other kinds.
    pub fn exceptions(&self) -> Specifier<TypeRepr> {
        match &self.kind {
            KindDelta::Method { exceptions } => exceptions.clone(),
            _ => Specifier::unchanged_delta(),
        }
    }
}

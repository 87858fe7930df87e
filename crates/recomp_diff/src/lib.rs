//! Structural differencing between two snapshots of the same member.
//!
//! Given a past and a current [`MemberSignature`](recomp_model::MemberSignature)
//! of equal identity, [`Difference::between`] computes a plain immutable
//! change record. Its [`no()`](Difference::no) predicate is the single
//! answer the recompilation scheduler consumes: `true` means nothing
//! observable to dependents changed. A false `true` causes a silently
//! stale build, so every ambiguous case reports changed.

#![warn(missing_docs)]

pub mod difference;
pub mod specifier;

pub use difference::{Difference, KindDelta, ModifierDelta};
pub use specifier::Specifier;

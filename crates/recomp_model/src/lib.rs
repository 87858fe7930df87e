//! Type and signature model for tracked compiled units.
//!
//! This crate defines the canonical, interned representation of JVM-style
//! types ([`TypeRepr`]), the structural signatures of a compiled unit's
//! declared members ([`MemberSignature`]), and the usage entries
//! ([`Usage`], [`UsageCluster`]) that feed the reverse dependency index.
//! All interning goes through an explicit [`DependencyContext`] whose
//! lifetime is one build session.

#![warn(missing_docs)]

pub mod const_value;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod flags;
pub mod member;
pub mod types;
pub mod usage;

pub use const_value::ConstValue;
pub use context::DependencyContext;
pub use error::ModelError;
pub use flags::AccessFlags;
pub use member::{MemberKey, MemberKind, MemberSignature};
pub use types::{PrimitiveKind, TypeRepr};
pub use usage::{Usage, UsageCluster};

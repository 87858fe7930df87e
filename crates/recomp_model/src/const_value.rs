//! Constant values attached to member signatures.

use serde::{Deserialize, Serialize};

/// A compile-time constant attached to a member.
///
/// Carried for constant fields (`static final int X = 5`) and
/// annotation-method defaults. The differencing engine cares about both
/// presence (a constant appearing or disappearing is a dependency-relevant
/// change) and content (a constant changing value forces dependents that
/// inlined it to recompile).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConstValue {
    /// An int-family constant (boolean, byte, short, char, int).
    Int(i32),
    /// A long constant.
    Long(i64),
    /// A float constant, compared bit-exactly.
    Float(f32),
    /// A double constant, compared bit-exactly.
    Double(f64),
    /// A string constant.
    Str(String),
}

// Bit-exact float comparison: IEEE `==` would make a NaN constant unequal
// to itself (a spurious change on every build) and treat `0.0` and `-0.0`
// as equal (a missed change dependents may have inlined).
impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstValue::Int(a), ConstValue::Int(b)) => a == b,
            (ConstValue::Long(a), ConstValue::Long(b)) => a == b,
            (ConstValue::Float(a), ConstValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ConstValue::Double(a), ConstValue::Double(b)) => a.to_bits() == b.to_bits(),
            (ConstValue::Str(a), ConstValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConstValue {}

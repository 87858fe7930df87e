//! Access and modifier flag bitsets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

bitflags! {
    /// Recognized JVM access and modifier flags.
    ///
    /// A [`MemberSignature`](crate::MemberSignature)'s bitset only ever
    /// contains these bits: raw input with unknown bits set is rejected at
    /// construction rather than carried along.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    pub struct AccessFlags: u16 {
        /// `public`.
        const PUBLIC = 0x0001;
        /// `private`.
        const PRIVATE = 0x0002;
        /// `protected`.
        const PROTECTED = 0x0004;
        /// `static`.
        const STATIC = 0x0008;
        /// `final`.
        const FINAL = 0x0010;
        /// `synchronized` on methods, `ACC_SUPER` on classes.
        const SYNCHRONIZED = 0x0020;
        /// `volatile` on fields, bridge-method marker on methods.
        const VOLATILE = 0x0040;
        /// `transient` on fields, varargs marker on methods.
        const TRANSIENT = 0x0080;
        /// `native`.
        const NATIVE = 0x0100;
        /// Interface marker on classes.
        const INTERFACE = 0x0200;
        /// `abstract`.
        const ABSTRACT = 0x0400;
        /// `strictfp`.
        const STRICT = 0x0800;
        /// Compiler-generated member marker.
        const SYNTHETIC = 0x1000;
        /// Annotation-type marker on classes.
        const ANNOTATION = 0x2000;
        /// Enum marker.
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Validates a raw modifier bitset from compiler output.
    ///
    /// Returns [`ModelError::UnrecognizedFlags`] if any bit outside the
    /// recognized flag set is present.
    pub fn from_raw(bits: u16) -> Result<Self, ModelError> {
        Self::from_bits(bits).ok_or(ModelError::UnrecognizedFlags { bits })
    }
}

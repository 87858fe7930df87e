//! Raw compiled-unit data as supplied by the external compiler-output
//! reader.
//!
//! The tracker never parses bytecode itself: descriptors, modifier
//! bitsets, constant values, declared exceptions, and constant-pool
//! references arrive pre-extracted.

use recomp_model::ConstValue;
use serde::{Deserialize, Serialize};

/// A raw reference the unit makes, as found in its constant pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawUsage {
    /// A reference to a class as a whole.
    Class {
        /// Internal name of the referenced class.
        class: String,
    },
    /// A reference to a field.
    Field {
        /// Internal name of the declaring class.
        owner: String,
        /// Field name.
        name: String,
        /// Field type descriptor.
        descriptor: String,
    },
    /// A reference to a method.
    Method {
        /// Internal name of the declaring class.
        owner: String,
        /// Method name.
        name: String,
        /// Overload key `(<arg descriptors>)<return descriptor>`.
        descriptor: String,
    },
}

/// One raw declared member of a compiled unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawMember {
    /// A field declaration.
    Field {
        /// Raw access/modifier bitset.
        access: u16,
        /// Field name.
        name: String,
        /// Field type descriptor.
        descriptor: String,
        /// Constant value, if the field has one.
        value: Option<ConstValue>,
    },
    /// A method declaration.
    Method {
        /// Raw access/modifier bitset.
        access: u16,
        /// Method name.
        name: String,
        /// Method descriptor `(<args>)<ret>`.
        descriptor: String,
        /// Internal names of declared thrown exceptions.
        exceptions: Vec<String>,
        /// Annotation-method default value, if any.
        value: Option<ConstValue>,
    },
}

/// One compiled unit's raw signature data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUnit {
    /// Internal name of the unit's class.
    pub name: String,
    /// Raw access/modifier bitset of the class itself.
    pub access: u16,
    /// Internal name of the direct superclass, absent for the root class.
    pub superclass: Option<String>,
    /// Internal names of directly implemented interfaces.
    pub interfaces: Vec<String>,
    /// Declared members.
    pub members: Vec<RawMember>,
    /// References the unit makes to members of other units.
    pub uses: Vec<RawUsage>,
}

impl RawUnit {
    /// Creates a unit with the given class name and no other data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: 0x0021, // public + super, the common case
            superclass: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            members: Vec::new(),
            uses: Vec::new(),
        }
    }
}

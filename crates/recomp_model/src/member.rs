//! Structural signatures of a compiled unit's declared members.
//!
//! Fields, methods, and classes share a common set of proto fields
//! (modifiers, owner, name, declared type, optional constant) and carry a
//! kind-specific payload. All three kinds feed the same differencing
//! contract; dispatch is by pattern matching on [`MemberKind`].

use std::collections::HashSet;

use recomp_common::Symbol;

use crate::const_value::ConstValue;
use crate::context::DependencyContext;
use crate::descriptor::{parse_method_descriptor, parse_type_descriptor};
use crate::error::ModelError;
use crate::flags::AccessFlags;
use crate::types::TypeRepr;
use crate::usage::{Usage, UsageCluster};

/// Kind-specific payload of a member signature.
#[derive(Clone, Debug, PartialEq)]
pub enum MemberKind {
    /// A field; the proto `ty` is the field type.
    Field,
    /// A method; the proto `ty` is the return type.
    Method {
        /// The ordered argument-type sequence. Order is part of the
        /// method's identity and of the wire contract.
        arg_types: Vec<TypeRepr>,
        /// The declared thrown-exception types, unordered.
        exceptions: HashSet<TypeRepr>,
    },
    /// A class declaration; the proto `ty` is the class's own type.
    Class {
        /// The direct superclass, absent only for the root class.
        superclass: Option<TypeRepr>,
        /// The directly implemented interfaces, unordered.
        interfaces: HashSet<TypeRepr>,
    },
}

/// The identity of a member within one compiled-unit snapshot.
///
/// This is the lookup key used to pair a current signature with its past
/// version. Method identity is deliberately argument-based: two methods
/// with the same name, return type, and argument sequence are the same
/// member for lookup purposes even if their modifiers, thrown exceptions,
/// or default value differ — those are diff content, not identity.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum MemberKey {
    /// Field identity: name and declared type.
    Field {
        /// Field name.
        name: Symbol,
        /// Field type.
        ty: TypeRepr,
    },
    /// Method identity: name, return type, and ordered argument types.
    Method {
        /// Method name.
        name: Symbol,
        /// Return type.
        ret: TypeRepr,
        /// Ordered argument types.
        args: Vec<TypeRepr>,
    },
    /// Class identity: the class name.
    Class {
        /// Internal class name.
        name: Symbol,
    },
}

/// The structural signature of one declared member.
///
/// Constructed once per compiled-unit read — either from raw compiler
/// output or from a persisted record — and immutable thereafter. The
/// signature lives until the containing unit's snapshot is replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberSignature {
    /// Access and modifier flags (recognized bits only).
    pub access: AccessFlags,
    /// Interned internal name of the declaring class.
    pub owner: Symbol,
    /// Interned member name.
    pub name: Symbol,
    /// Declared type: field type, method return type, or class self-type.
    pub ty: TypeRepr,
    /// Optional constant/default value.
    pub value: Option<ConstValue>,
    /// Kind-specific payload.
    pub kind: MemberKind,
}

impl MemberSignature {
    /// Builds a field signature from a raw type descriptor.
    pub fn field(
        ctx: &DependencyContext,
        raw_access: u16,
        owner: &str,
        name: &str,
        type_descriptor: &str,
        value: Option<ConstValue>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            access: AccessFlags::from_raw(raw_access)?,
            owner: ctx.symbol(owner),
            name: ctx.symbol(name),
            ty: parse_type_descriptor(ctx, type_descriptor)?,
            value,
            kind: MemberKind::Field,
        })
    }

    /// Builds a method signature from a raw method descriptor, the list of
    /// declared thrown-exception class names, and an optional default value.
    pub fn method(
        ctx: &DependencyContext,
        raw_access: u16,
        owner: &str,
        name: &str,
        method_descriptor: &str,
        exception_names: &[String],
        value: Option<ConstValue>,
    ) -> Result<Self, ModelError> {
        let (arg_types, ret) = parse_method_descriptor(ctx, method_descriptor)?;
        Ok(Self {
            access: AccessFlags::from_raw(raw_access)?,
            owner: ctx.symbol(owner),
            name: ctx.symbol(name),
            ty: ret,
            value,
            kind: MemberKind::Method {
                arg_types,
                exceptions: TypeRepr::class_set(ctx, exception_names),
            },
        })
    }

    /// Builds a class signature from raw superclass and interface names.
    pub fn class(
        ctx: &DependencyContext,
        raw_access: u16,
        name: &str,
        superclass: Option<&str>,
        interface_names: &[String],
    ) -> Result<Self, ModelError> {
        let name_sym = ctx.symbol(name);
        Ok(Self {
            access: AccessFlags::from_raw(raw_access)?,
            owner: name_sym,
            name: name_sym,
            ty: TypeRepr::Class(name_sym),
            value: None,
            kind: MemberKind::Class {
                superclass: superclass.map(|s| TypeRepr::class(ctx, s)),
                interfaces: TypeRepr::class_set(ctx, interface_names),
            },
        })
    }

    /// Returns the identity tuple used to pair this signature with a past
    /// version of the same member. See [`MemberKey`] for what is and is
    /// not part of identity.
    pub fn key(&self) -> MemberKey {
        match &self.kind {
            MemberKind::Field => MemberKey::Field {
                name: self.name,
                ty: self.ty.clone(),
            },
            MemberKind::Method { arg_types, .. } => MemberKey::Method {
                name: self.name,
                ret: self.ty.clone(),
                args: arg_types.clone(),
            },
            MemberKind::Class { .. } => MemberKey::Class { name: self.name },
        }
    }

    /// Returns `true` if this member carries a constant/default value.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Builds the reverse-index usage key for this member as declared by
    /// `owner`.
    ///
    /// Methods use the canonical overload key
    /// `"(" + concat(arg descriptors) + ")" + return descriptor`; fields
    /// use their type descriptor; classes map to a plain class usage.
    pub fn create_usage(&self, ctx: &DependencyContext, owner: Symbol) -> Usage {
        match &self.kind {
            MemberKind::Field => Usage::Field {
                owner,
                name: self.name,
                descr: ctx.symbol(&self.ty.descriptor(ctx)),
            },
            MemberKind::Method { arg_types, .. } => {
                let mut buf = String::from("(");
                for arg in arg_types {
                    buf.push_str(&arg.descriptor(ctx));
                }
                buf.push(')');
                buf.push_str(&self.ty.descriptor(ctx));
                Usage::Method {
                    owner,
                    name: self.name,
                    descr: ctx.symbol(&buf),
                }
            }
            MemberKind::Class { .. } => Usage::Class { class: self.name },
        }
    }

    /// Records a class usage for every class type this signature
    /// references: the declared type, each argument type, each thrown
    /// exception, and the superclass/interfaces for classes.
    pub fn update_class_usages(&self, cluster: &mut UsageCluster) {
        self.ty.update_class_usages(cluster);
        match &self.kind {
            MemberKind::Field => {}
            MemberKind::Method {
                arg_types,
                exceptions,
            } => {
                for arg in arg_types {
                    arg.update_class_usages(cluster);
                }
                for exc in exceptions {
                    exc.update_class_usages(cluster);
                }
            }
            MemberKind::Class {
                superclass,
                interfaces,
            } => {
                if let Some(sup) = superclass {
                    sup.update_class_usages(cluster);
                }
                for iface in interfaces {
                    iface.update_class_usages(cluster);
                }
            }
        }
    }
}

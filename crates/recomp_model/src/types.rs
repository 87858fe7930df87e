//! Canonical representation of JVM-style types.
//!
//! Types are immutable once constructed and support deep structural
//! equality and hashing, so they can be used both as values and as map
//! keys. Class references hold interned symbols, which makes structurally
//! identical class types symbol-identical within one session.

use std::collections::HashSet;

use recomp_common::Symbol;

use crate::context::DependencyContext;
use crate::usage::{Usage, UsageCluster};

/// A primitive JVM type, tagged by its single-character descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimitiveKind {
    /// `B` — byte.
    Byte,
    /// `C` — char.
    Char,
    /// `D` — double.
    Double,
    /// `F` — float.
    Float,
    /// `I` — int.
    Int,
    /// `J` — long.
    Long,
    /// `S` — short.
    Short,
    /// `Z` — boolean.
    Boolean,
    /// `V` — void (valid only as a method return type).
    Void,
}

impl PrimitiveKind {
    /// Returns the single-character descriptor for this primitive.
    pub fn descriptor_char(self) -> char {
        match self {
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Double => 'D',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Void => 'V',
        }
    }

    /// Maps a descriptor character to a primitive kind, if it is one.
    pub fn from_descriptor_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(PrimitiveKind::Byte),
            'C' => Some(PrimitiveKind::Char),
            'D' => Some(PrimitiveKind::Double),
            'F' => Some(PrimitiveKind::Float),
            'I' => Some(PrimitiveKind::Int),
            'J' => Some(PrimitiveKind::Long),
            'S' => Some(PrimitiveKind::Short),
            'Z' => Some(PrimitiveKind::Boolean),
            'V' => Some(PrimitiveKind::Void),
            _ => None,
        }
    }
}

/// A type as it appears in a member signature.
///
/// Structurally immutable; arrays of types built during signature
/// construction are fixed once built. Class names are interned internal
/// names (`java/lang/String`), so equality of class types reduces to
/// symbol equality.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeRepr {
    /// A primitive type.
    Primitive(PrimitiveKind),
    /// An array type wrapping its element type.
    Array(Box<TypeRepr>),
    /// A reference to a class, by interned internal name.
    Class(Symbol),
}

impl TypeRepr {
    /// Builds a class type from a raw internal class name.
    pub fn class(ctx: &DependencyContext, internal_name: &str) -> Self {
        TypeRepr::Class(ctx.symbol(internal_name))
    }

    /// Builds the set of class types for a list of raw class names.
    ///
    /// Used for declared-exception lists and implemented-interface lists,
    /// which are unordered sets of class references.
    pub fn class_set(ctx: &DependencyContext, internal_names: &[String]) -> HashSet<TypeRepr> {
        internal_names
            .iter()
            .map(|n| TypeRepr::class(ctx, n))
            .collect()
    }

    /// Renders the canonical textual descriptor for this type.
    ///
    /// This is the exact inverse of
    /// [`parse_type_descriptor`](crate::descriptor::parse_type_descriptor):
    /// parsing the returned string yields a structurally equal type.
    pub fn descriptor(&self, ctx: &DependencyContext) -> String {
        let mut out = String::new();
        self.push_descriptor(ctx, &mut out);
        out
    }

    fn push_descriptor(&self, ctx: &DependencyContext, out: &mut String) {
        match self {
            TypeRepr::Primitive(kind) => out.push(kind.descriptor_char()),
            TypeRepr::Array(element) => {
                out.push('[');
                element.push_descriptor(ctx, out);
            }
            TypeRepr::Class(sym) => {
                out.push('L');
                out.push_str(ctx.resolve(*sym));
                out.push(';');
            }
        }
    }

    /// Records a usage of every class this type references into the cluster.
    ///
    /// Class types record one class usage; array types recurse into their
    /// element type; primitives record nothing. The type itself is never
    /// mutated.
    pub fn update_class_usages(&self, cluster: &mut UsageCluster) {
        match self {
            TypeRepr::Primitive(_) => {}
            TypeRepr::Array(element) => element.update_class_usages(cluster),
            TypeRepr::Class(sym) => {
                cluster.add(Usage::Class { class: *sym });
            }
        }
    }
}

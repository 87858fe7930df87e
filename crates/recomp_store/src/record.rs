//! Persisted per-unit records and the whole-index snapshot.

use std::collections::HashMap;
use std::io::{Read, Write};

use recomp_common::Symbol;
use recomp_model::{
    AccessFlags, ConstValue, DependencyContext, MemberKind, MemberSignature, TypeRepr,
    UsageCluster,
};

use crate::error::StoreError;
use crate::wire::{
    read_many, read_symbol, read_u16, read_u32, read_u8, write_many, write_symbol, write_u16,
    write_u32, write_u8, WireRead, WireWrite,
};

const KIND_FIELD: u8 = 0;
const KIND_METHOD: u8 = 1;
const KIND_CLASS: u8 = 2;

// The member wire layout is proto fields first (access, owner, name,
// declared type, optional value), then the kind tag and its extras. The
// argument-type sequence keeps declaration order; exception and interface
// sets are sorted by descriptor so snapshot bytes are deterministic.
impl WireWrite for MemberSignature {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        write_u16(w, self.access.bits())?;
        write_symbol(ctx, w, self.owner)?;
        write_symbol(ctx, w, self.name)?;
        self.ty.write(ctx, w)?;
        self.value.write(ctx, w)?;

        match &self.kind {
            MemberKind::Field => write_u8(w, KIND_FIELD),
            MemberKind::Method {
                arg_types,
                exceptions,
            } => {
                write_u8(w, KIND_METHOD)?;
                write_many(ctx, w, arg_types)?;
                write_many(ctx, w, &sorted_types(ctx, exceptions.iter()))
            }
            MemberKind::Class {
                superclass,
                interfaces,
            } => {
                write_u8(w, KIND_CLASS)?;
                superclass.write(ctx, w)?;
                write_many(ctx, w, &sorted_types(ctx, interfaces.iter()))
            }
        }
    }
}

impl WireRead for MemberSignature {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        let bits = read_u16(r)?;
        let access = AccessFlags::from_bits(bits)
            .ok_or_else(|| StoreError::corrupt(format!("bad access flag bits {bits:#06x}")))?;
        let owner = read_symbol(ctx, r)?;
        let name = read_symbol(ctx, r)?;
        let ty = TypeRepr::read(ctx, r)?;
        let value = Option::<ConstValue>::read(ctx, r)?;

        let kind = match read_u8(r)? {
            KIND_FIELD => MemberKind::Field,
            KIND_METHOD => MemberKind::Method {
                arg_types: read_many(ctx, r)?,
                exceptions: read_many::<TypeRepr>(ctx, r)?.into_iter().collect(),
            },
            KIND_CLASS => MemberKind::Class {
                superclass: Option::<TypeRepr>::read(ctx, r)?,
                interfaces: read_many::<TypeRepr>(ctx, r)?.into_iter().collect(),
            },
            tag => return Err(StoreError::corrupt(format!("bad member kind tag {tag}"))),
        };

        Ok(MemberSignature {
            access,
            owner,
            name,
            ty,
            value,
            kind,
        })
    }
}

fn sorted_types<'a, I: Iterator<Item = &'a TypeRepr>>(
    ctx: &DependencyContext,
    types: I,
) -> Vec<TypeRepr> {
    let mut out: Vec<TypeRepr> = types.cloned().collect();
    out.sort_by_key(|t| t.descriptor(ctx));
    out
}

/// One compiled unit's persisted record: its declared member signatures
/// and exactly one usage cluster (the usages the unit makes).
#[derive(Clone, Debug, PartialEq)]
pub struct UnitRecord {
    /// Interned internal name of the unit.
    pub unit: Symbol,
    /// The unit's declared members.
    pub members: Vec<MemberSignature>,
    /// The usages this unit makes.
    pub usages: UsageCluster,
}

impl WireWrite for UnitRecord {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        write_symbol(ctx, w, self.unit)?;
        let mut members = self.members.clone();
        members.sort_by_key(|m| member_sort_key(ctx, m));
        write_many(ctx, w, &members)?;
        self.usages.write(ctx, w)
    }
}

impl WireRead for UnitRecord {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        Ok(UnitRecord {
            unit: read_symbol(ctx, r)?,
            members: read_many(ctx, r)?,
            usages: UsageCluster::read(ctx, r)?,
        })
    }
}

fn member_sort_key(ctx: &DependencyContext, m: &MemberSignature) -> (u8, String, String) {
    let extra = match &m.kind {
        MemberKind::Field => m.ty.descriptor(ctx),
        MemberKind::Method { arg_types, .. } => {
            let mut buf = String::from("(");
            for arg in arg_types {
                buf.push_str(&arg.descriptor(ctx));
            }
            buf.push(')');
            buf.push_str(&m.ty.descriptor(ctx));
            buf
        }
        MemberKind::Class { .. } => String::new(),
    };
    let tag = match &m.kind {
        MemberKind::Field => 0,
        MemberKind::Method { .. } => 1,
        MemberKind::Class { .. } => 2,
    };
    (tag, ctx.resolve(m.name).to_string(), extra)
}

/// The full persisted index: one record per tracked unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    units: HashMap<Symbol, UnitRecord>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a unit's record.
    pub fn insert(&mut self, record: UnitRecord) {
        self.units.insert(record.unit, record);
    }

    /// Returns the record for a unit, if tracked.
    pub fn unit(&self, unit: Symbol) -> Option<&UnitRecord> {
        self.units.get(&unit)
    }

    /// Iterates over all unit records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitRecord> {
        self.units.values()
    }

    /// Returns the number of tracked units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if no units are tracked.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl WireWrite for Snapshot {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        let mut records: Vec<&UnitRecord> = self.units.values().collect();
        records.sort_by_key(|rec| ctx.resolve(rec.unit).to_string());
        write_u32(w, records.len() as u32)?;
        for record in records {
            record.write(ctx, w)?;
        }
        Ok(())
    }
}

impl WireRead for Snapshot {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        let count = read_u32(r)?;
        let mut snapshot = Snapshot::new();
        for _ in 0..count {
            snapshot.insert(UnitRecord::read(ctx, r)?);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recomp_model::Usage;

    fn sample_unit(ctx: &DependencyContext) -> UnitRecord {
        let unit = ctx.symbol("com/example/Foo");
        let field = MemberSignature::field(
            ctx,
            0x0019,
            "com/example/Foo",
            "LIMIT",
            "I",
            Some(ConstValue::Int(5)),
        )
        .unwrap();
        let method = MemberSignature::method(
            ctx,
            0x0001,
            "com/example/Foo",
            "foo",
            "(Ljava/lang/String;)I",
            &["java/io/IOException".to_string()],
            None,
        )
        .unwrap();
        let mut usages = UsageCluster::new();
        for member in [&field, &method] {
            member.update_class_usages(&mut usages);
        }
        usages.add(Usage::Method {
            owner: ctx.symbol("com/example/Bar"),
            name: ctx.symbol("helper"),
            descr: ctx.symbol("()V"),
        });
        UnitRecord {
            unit,
            members: vec![field, method],
            usages,
        }
    }

    fn roundtrip<T: WireWrite + WireRead>(ctx: &DependencyContext, value: &T) -> T {
        let mut buf = Vec::new();
        value.write(ctx, &mut buf).unwrap();
        T::read(ctx, &mut buf.as_slice()).unwrap()
    }

    #[test]
    fn member_roundtrip_preserves_everything() {
        let ctx = DependencyContext::new();
        let record = sample_unit(&ctx);
        for member in &record.members {
            let back = roundtrip(&ctx, member);
            assert_eq!(back.key(), member.key());
            assert_eq!(back.access, member.access);
            assert_eq!(back.value, member.value);
            assert_eq!(back.kind, member.kind);
        }
    }

    #[test]
    fn argument_order_survives_roundtrip() {
        let ctx = DependencyContext::new();
        let method = MemberSignature::method(
            &ctx,
            0x0001,
            "A",
            "f",
            "(Ljava/lang/String;IJ)V",
            &[],
            None,
        )
        .unwrap();
        let back = roundtrip(&ctx, &method);
        match (&method.kind, &back.kind) {
            (
                MemberKind::Method { arg_types: a, .. },
                MemberKind::Method { arg_types: b, .. },
            ) => assert_eq!(a, b),
            _ => unreachable!(),
        }
    }

    #[test]
    fn unit_record_roundtrip() {
        let ctx = DependencyContext::new();
        let record = sample_unit(&ctx);
        let back = roundtrip(&ctx, &record);
        assert_eq!(back.unit, record.unit);
        assert_eq!(back.usages, record.usages);
        assert_eq!(back.members.len(), record.members.len());
    }

    #[test]
    fn snapshot_roundtrip_and_deterministic_bytes() {
        let ctx = DependencyContext::new();
        let mut snapshot = Snapshot::new();
        snapshot.insert(sample_unit(&ctx));

        let mut buf1 = Vec::new();
        snapshot.write(&ctx, &mut buf1).unwrap();
        let mut buf2 = Vec::new();
        snapshot.write(&ctx, &mut buf2).unwrap();
        assert_eq!(buf1, buf2);

        let back = roundtrip(&ctx, &snapshot);
        assert_eq!(back.len(), 1);
        let unit = ctx.symbol("com/example/Foo");
        assert_eq!(back.unit(unit).unwrap().usages, snapshot.unit(unit).unwrap().usages);
    }

    #[test]
    fn class_record_roundtrip() {
        let ctx = DependencyContext::new();
        let class = MemberSignature::class(
            &ctx,
            0x0021,
            "com/example/Impl",
            Some("com/example/Base"),
            &["java/io/Closeable".to_string(), "java/lang/Runnable".to_string()],
        )
        .unwrap();
        let back = roundtrip(&ctx, &class);
        assert_eq!(back.kind, class.kind);
    }

    #[test]
    fn truncated_record_is_corrupt() {
        let ctx = DependencyContext::new();
        let record = sample_unit(&ctx);
        let mut buf = Vec::new();
        record.write(&ctx, &mut buf).unwrap();
        buf.truncate(buf.len() / 2);
        let err = UnitRecord::read(&ctx, &mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}

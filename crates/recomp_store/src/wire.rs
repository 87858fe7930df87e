//! Ordered wire codec for persisted records.
//!
//! Every composite writer emits its sub-fields in the exact order its
//! reader consumes them — proto fields first, then kind-specific extras.
//! This ordering is the wire contract; changing it breaks existing
//! persisted indices. Interned symbols are written as their raw strings
//! and re-interned on read, because interner indices are session-local.
//!
//! Collections round-trip through [`write_many`]/[`read_many`], a
//! count-prefixed element stream. Unordered sets are written in sorted
//! order so that identical snapshots produce identical bytes (stable
//! checksums); ordered sequences (method argument types) are written in
//! declaration order, which is part of the contract.

use std::io::{Read, Write};

use recomp_common::Symbol;
use recomp_model::{
    descriptor::parse_type_descriptor, ConstValue, DependencyContext, TypeRepr, Usage,
    UsageCluster,
};

use crate::error::StoreError;

/// Upper bound on a single string record. Anything larger is corrupt data,
/// not a real descriptor or class name.
const MAX_STRING_LEN: u32 = 1 << 20;

/// Upper bound on element counts in [`read_many`].
const MAX_ELEMENT_COUNT: u32 = 1 << 24;

/// A value that can be written to the persisted record stream.
pub trait WireWrite {
    /// Writes this value, emitting sub-fields in reader order.
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()>;
}

/// A value that can be read back from the persisted record stream.
pub trait WireRead: Sized {
    /// Reads one value, consuming exactly what the writer emitted.
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError>;
}

/// Writes a count-prefixed sequence of elements in iteration order.
pub fn write_many<T: WireWrite>(
    ctx: &DependencyContext,
    w: &mut impl Write,
    items: &[T],
) -> std::io::Result<()> {
    write_u32(w, items.len() as u32)?;
    for item in items {
        item.write(ctx, w)?;
    }
    Ok(())
}

/// Reads a count-prefixed sequence of elements written by [`write_many`].
pub fn read_many<T: WireRead>(
    ctx: &DependencyContext,
    r: &mut impl Read,
) -> Result<Vec<T>, StoreError> {
    let count = read_u32(r)?;
    if count > MAX_ELEMENT_COUNT {
        return Err(StoreError::corrupt(format!(
            "implausible element count {count}"
        )));
    }
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(T::read(ctx, r)?);
    }
    Ok(items)
}

pub(crate) fn write_u8(w: &mut impl Write, v: u8) -> std::io::Result<()> {
    w.write_all(&[v])
}

pub(crate) fn read_u8(r: &mut impl Read) -> Result<u8, StoreError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)
        .map_err(|_| StoreError::corrupt("unexpected end of stream"))?;
    Ok(buf[0])
}

pub(crate) fn write_u16(w: &mut impl Write, v: u16) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub(crate) fn read_u16(r: &mut impl Read) -> Result<u16, StoreError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)
        .map_err(|_| StoreError::corrupt("unexpected end of stream"))?;
    Ok(u16::from_le_bytes(buf))
}

pub(crate) fn write_u32(w: &mut impl Write, v: u32) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub(crate) fn read_u32(r: &mut impl Read) -> Result<u32, StoreError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|_| StoreError::corrupt("unexpected end of stream"))?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn write_u64(w: &mut impl Write, v: u64) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub(crate) fn read_u64(r: &mut impl Read) -> Result<u64, StoreError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)
        .map_err(|_| StoreError::corrupt("unexpected end of stream"))?;
    Ok(u64::from_le_bytes(buf))
}

pub(crate) fn write_str(w: &mut impl Write, s: &str) -> std::io::Result<()> {
    write_u32(w, s.len() as u32)?;
    w.write_all(s.as_bytes())
}

pub(crate) fn read_str(r: &mut impl Read) -> Result<String, StoreError> {
    let len = read_u32(r)?;
    if len > MAX_STRING_LEN {
        return Err(StoreError::corrupt(format!(
            "implausible string length {len}"
        )));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)
        .map_err(|_| StoreError::corrupt("unexpected end of stream"))?;
    String::from_utf8(buf).map_err(|_| StoreError::corrupt("invalid UTF-8 in string record"))
}

pub(crate) fn write_symbol(
    ctx: &DependencyContext,
    w: &mut impl Write,
    sym: Symbol,
) -> std::io::Result<()> {
    write_str(w, ctx.resolve(sym))
}

pub(crate) fn read_symbol(
    ctx: &DependencyContext,
    r: &mut impl Read,
) -> Result<Symbol, StoreError> {
    Ok(ctx.symbol(&read_str(r)?))
}

// Types round-trip as their canonical descriptor text, which reuses the
// descriptor parser for validation on read.
impl WireWrite for TypeRepr {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        write_str(w, &self.descriptor(ctx))
    }
}

impl WireRead for TypeRepr {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        let text = read_str(r)?;
        parse_type_descriptor(ctx, &text)
            .map_err(|e| StoreError::corrupt(format!("bad persisted type descriptor: {e}")))
    }
}

impl WireWrite for ConstValue {
    fn write(&self, _ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        match self {
            ConstValue::Int(v) => {
                write_u8(w, 0)?;
                write_u32(w, *v as u32)
            }
            ConstValue::Long(v) => {
                write_u8(w, 1)?;
                write_u64(w, *v as u64)
            }
            ConstValue::Float(v) => {
                write_u8(w, 2)?;
                write_u32(w, v.to_bits())
            }
            ConstValue::Double(v) => {
                write_u8(w, 3)?;
                write_u64(w, v.to_bits())
            }
            ConstValue::Str(s) => {
                write_u8(w, 4)?;
                write_str(w, s)
            }
        }
    }
}

impl WireRead for ConstValue {
    fn read(_ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        match read_u8(r)? {
            0 => Ok(ConstValue::Int(read_u32(r)? as i32)),
            1 => Ok(ConstValue::Long(read_u64(r)? as i64)),
            2 => Ok(ConstValue::Float(f32::from_bits(read_u32(r)?))),
            3 => Ok(ConstValue::Double(f64::from_bits(read_u64(r)?))),
            4 => Ok(ConstValue::Str(read_str(r)?)),
            tag => Err(StoreError::corrupt(format!("bad constant tag {tag}"))),
        }
    }
}

impl<T: WireWrite> WireWrite for Option<T> {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        match self {
            None => write_u8(w, 0),
            Some(v) => {
                write_u8(w, 1)?;
                v.write(ctx, w)
            }
        }
    }
}

impl<T: WireRead> WireRead for Option<T> {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        match read_u8(r)? {
            0 => Ok(None),
            1 => Ok(Some(T::read(ctx, r)?)),
            tag => Err(StoreError::corrupt(format!("bad option tag {tag}"))),
        }
    }
}

impl WireWrite for Usage {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        match self {
            Usage::Class { class } => {
                write_u8(w, 0)?;
                write_symbol(ctx, w, *class)
            }
            Usage::Field { owner, name, descr } => {
                write_u8(w, 1)?;
                write_symbol(ctx, w, *owner)?;
                write_symbol(ctx, w, *name)?;
                write_symbol(ctx, w, *descr)
            }
            Usage::Method { owner, name, descr } => {
                write_u8(w, 2)?;
                write_symbol(ctx, w, *owner)?;
                write_symbol(ctx, w, *name)?;
                write_symbol(ctx, w, *descr)
            }
        }
    }
}

impl WireRead for Usage {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        match read_u8(r)? {
            0 => Ok(Usage::Class {
                class: read_symbol(ctx, r)?,
            }),
            1 => Ok(Usage::Field {
                owner: read_symbol(ctx, r)?,
                name: read_symbol(ctx, r)?,
                descr: read_symbol(ctx, r)?,
            }),
            2 => Ok(Usage::Method {
                owner: read_symbol(ctx, r)?,
                name: read_symbol(ctx, r)?,
                descr: read_symbol(ctx, r)?,
            }),
            tag => Err(StoreError::corrupt(format!("bad usage tag {tag}"))),
        }
    }
}

/// Sort key for deterministic cluster serialization.
pub(crate) fn usage_sort_key(ctx: &DependencyContext, usage: &Usage) -> (u8, String, String, String) {
    match usage {
        Usage::Class { class } => (0, ctx.resolve(*class).to_string(), String::new(), String::new()),
        Usage::Field { owner, name, descr } => (
            1,
            ctx.resolve(*owner).to_string(),
            ctx.resolve(*name).to_string(),
            ctx.resolve(*descr).to_string(),
        ),
        Usage::Method { owner, name, descr } => (
            2,
            ctx.resolve(*owner).to_string(),
            ctx.resolve(*name).to_string(),
            ctx.resolve(*descr).to_string(),
        ),
    }
}

impl WireWrite for UsageCluster {
    fn write(&self, ctx: &DependencyContext, w: &mut impl Write) -> std::io::Result<()> {
        let mut usages: Vec<Usage> = self.iter().copied().collect();
        usages.sort_by_key(|u| usage_sort_key(ctx, u));
        write_many(ctx, w, &usages)
    }
}

impl WireRead for UsageCluster {
    fn read(ctx: &DependencyContext, r: &mut impl Read) -> Result<Self, StoreError> {
        Ok(read_many::<Usage>(ctx, r)?.into_iter().collect())
    }
}

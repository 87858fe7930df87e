//! Shared foundational types for the recomp dependency tracker.
//!
//! This crate provides interned symbols backed by a thread-safe string
//! interner, and the content hash used to checksum persisted snapshots.

#![warn(missing_docs)]

pub mod hash;
pub mod symbol;

pub use hash::ContentHash;
pub use symbol::{Interner, Symbol};

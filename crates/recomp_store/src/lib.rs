//! Durable storage for signature snapshots and usage clusters.
//!
//! One snapshot file holds every tracked unit's record (its member
//! signatures plus its usage cluster). Saves go through a temp file and an
//! atomic rename, so a crash mid-write leaves either the previous valid
//! snapshot or an ignorable temp file — never a readable-but-wrong store.
//! Loads are fail-safe: any structural problem yields "no snapshot",
//! which forces a full reindex instead of partial trust.

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod snapshot;
pub mod wire;

pub use error::StoreError;
pub use record::{Snapshot, UnitRecord};
pub use snapshot::SnapshotStore;
pub use wire::{read_many, write_many, WireRead, WireWrite};

//! Snapshot file management with atomic replacement.
//!
//! The snapshot file carries a binary header (magic bytes, format version,
//! payload checksum) ahead of the wire-encoded [`Snapshot`]. Saves write
//! the complete file to a temp path in the same directory and atomically
//! rename it over the previous snapshot, so readers only ever observe a
//! complete file.

use std::path::{Path, PathBuf};

use recomp_common::ContentHash;
use recomp_model::DependencyContext;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::Snapshot;
use crate::wire::{WireRead, WireWrite};

/// Magic bytes identifying a recomp snapshot file.
const SNAPSHOT_MAGIC: [u8; 4] = *b"RCMP";

/// Current snapshot format version. Increment on breaking changes to the
/// header or record layout.
const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Name of the snapshot file within the store directory.
const SNAPSHOT_FILE: &str = "deps.snapshot";

/// Suffix for the in-progress temp file.
const TMP_SUFFIX: &str = ".tmp";

/// Header prepended to the snapshot payload for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotHeader {
    /// Magic bytes: must be `b"RCMP"`.
    magic: [u8; 4],
    /// Snapshot format version.
    format_version: u32,
    /// Content hash of the payload (for integrity checks).
    checksum: ContentHash,
}

/// Reads and writes the persisted snapshot in a store directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Returns the path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Loads the snapshot, returning `None` on any failure.
    ///
    /// This is fail-safe: a missing file, bad magic, version mismatch,
    /// checksum mismatch, or structural read failure all yield `None`,
    /// which the session treats as "no prior state, full rebuild".
    /// Corruption is never silently patched.
    pub fn load(&self, ctx: &DependencyContext) -> Option<Snapshot> {
        self.try_load(ctx).ok()
    }

    /// Loads the snapshot, reporting why it failed if it did.
    pub fn try_load(&self, ctx: &DependencyContext) -> Result<Snapshot, StoreError> {
        let path = self.snapshot_path();
        let raw = std::fs::read(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;

        if raw.len() < 4 {
            return Err(StoreError::corrupt("snapshot shorter than header length"));
        }
        let header_len = raw[..4]
            .try_into()
            .map(u32::from_le_bytes)
            .map_err(|_| StoreError::corrupt("snapshot shorter than header length"))?
            as usize;
        if raw.len() < 4 + header_len {
            return Err(StoreError::corrupt("snapshot shorter than declared header"));
        }

        let header: SnapshotHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .map_err(|e| StoreError::corrupt(format!("bad header: {e}")))?
                .0;

        if header.magic != SNAPSHOT_MAGIC {
            return Err(StoreError::corrupt("bad magic bytes"));
        }
        if header.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::corrupt(format!(
                "format version {} (expected {})",
                header.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return Err(StoreError::corrupt("payload checksum mismatch"));
        }

        let mut cursor = payload;
        let snapshot = Snapshot::read(ctx, &mut cursor)?;
        if !cursor.is_empty() {
            return Err(StoreError::corrupt("trailing bytes after snapshot"));
        }
        Ok(snapshot)
    }

    /// Saves the snapshot, atomically replacing any previous one.
    ///
    /// The complete file is written to `deps.snapshot.tmp` in the store
    /// directory and renamed into place; a crash mid-write leaves the old
    /// snapshot untouched.
    pub fn save(
        &self,
        ctx: &DependencyContext,
        snapshot: &Snapshot,
    ) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut payload = Vec::new();
        snapshot
            .write(ctx, &mut payload)
            .map_err(|e| StoreError::Serialization {
                reason: e.to_string(),
            })?;

        let header = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            format_version: SNAPSHOT_FORMAT_VERSION,
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| StoreError::Serialization {
                reason: e.to_string(),
            })?;

        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);

        let final_path = self.snapshot_path();
        let tmp_path = self.dir.join(format!("{SNAPSHOT_FILE}{TMP_SUFFIX}"));
        std::fs::write(&tmp_path, &output).map_err(|e| StoreError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &final_path).map_err(|e| StoreError::Io {
            path: final_path,
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UnitRecord;
    use recomp_model::{MemberSignature, UsageCluster};

    fn sample_snapshot(ctx: &DependencyContext) -> Snapshot {
        let method = MemberSignature::method(
            ctx,
            0x0001,
            "com/example/Foo",
            "foo",
            "(I)V",
            &["java/io/IOException".to_string()],
            None,
        )
        .unwrap();
        let mut usages = UsageCluster::new();
        method.update_class_usages(&mut usages);
        let mut snapshot = Snapshot::new();
        snapshot.insert(UnitRecord {
            unit: ctx.symbol("com/example/Foo"),
            members: vec![method],
            usages,
        });
        snapshot
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DependencyContext::new();
        let store = SnapshotStore::new(dir.path());
        let snapshot = sample_snapshot(&ctx);
        store.save(&ctx, &snapshot).unwrap();

        let loaded = store.load(&ctx).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DependencyContext::new();
        let store = SnapshotStore::new(dir.path());
        assert!(store.load(&ctx).is_none());
    }

    #[test]
    fn load_garbage_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DependencyContext::new();
        let store = SnapshotStore::new(dir.path());
        std::fs::write(store.snapshot_path(), b"not a snapshot").unwrap();
        assert!(store.load(&ctx).is_none());
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DependencyContext::new();
        let store = SnapshotStore::new(dir.path());
        store.save(&ctx, &sample_snapshot(&ctx)).unwrap();

        // Flip a byte near the end of the file (inside the payload).
        let path = store.snapshot_path();
        let mut raw = std::fs::read(&path).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        std::fs::write(&path, &raw).unwrap();

        let err = store.try_load(&ctx).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(store.load(&ctx).is_none());
    }

    #[test]
    fn save_replaces_previous_snapshot_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DependencyContext::new();
        let store = SnapshotStore::new(dir.path());

        store.save(&ctx, &sample_snapshot(&ctx)).unwrap();
        let empty = Snapshot::new();
        store.save(&ctx, &empty).unwrap();

        let loaded = store.load(&ctx).unwrap();
        assert!(loaded.is_empty());
        // No temp debris left behind.
        assert!(!dir.path().join("deps.snapshot.tmp").exists());
    }

    #[test]
    fn symbols_reintern_in_fresh_context() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let ctx1 = DependencyContext::new();
        store.save(&ctx1, &sample_snapshot(&ctx1)).unwrap();

        // A fresh session has a fresh interner; names must still resolve.
        let ctx2 = DependencyContext::new();
        // Skew the new interner so raw indices cannot line up by accident.
        ctx2.symbol("unrelated/Padding");
        let loaded = store.load(&ctx2).unwrap();
        let unit = ctx2.symbol("com/example/Foo");
        let record = loaded.unit(unit).expect("unit present under re-interned name");
        assert_eq!(ctx2.resolve(record.members[0].name), "foo");
    }
}

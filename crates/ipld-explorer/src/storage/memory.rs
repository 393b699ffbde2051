//! In-memory block storage implementation

use crate::error::Result;
use crate::identifier::{Identifier, IpldCid, compute_cid};
use crate::storage::BlockSource;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory block storage using BTreeMap
///
/// Useful for:
/// - Testing
/// - Graphs assembled on the fly
/// - Small CAR files loaded up front
///
/// Uses `Bytes` for efficient reference-counted storage with cheap cloning.
/// Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryBlockStore {
    blocks: Arc<RwLock<BTreeMap<IpldCid, Bytes>>>,
}

impl MemoryBlockStore {
    /// Create new empty memory store
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create new memory store from a map of blocks
    pub fn new_from_blocks(blocks: BTreeMap<IpldCid, Bytes>) -> Self {
        Self {
            blocks: Arc::new(RwLock::new(blocks)),
        }
    }

    /// Get number of blocks stored
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Store already-encoded bytes, tagging the identifier with `codec`
    ///
    /// The identifier is a CIDv1 over the SHA-256 of `data`, so the same bytes
    /// under the same codec always land on the same identifier.
    pub fn put(&self, codec: u64, data: impl Into<Bytes>) -> Result<Identifier> {
        let data = data.into();
        let cid = compute_cid(codec, &data)?;
        self.write().insert(cid, data);
        Ok(cid.into())
    }

    /// Store a block under a caller-chosen CID
    ///
    /// # Note
    ///
    /// This bypasses CID verification.
    pub fn put_with_cid(&self, cid: IpldCid, data: impl Into<Bytes>) {
        self.write().insert(cid, data.into());
    }

    /// Snapshot of all blocks
    pub fn blocks(&self) -> BTreeMap<IpldCid, Bytes> {
        self.read().clone()
    }

    // a poisoned lock only means a writer panicked mid-insert; the map is still usable
    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<IpldCid, Bytes>> {
        self.blocks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<IpldCid, Bytes>> {
        self.blocks.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockSource for MemoryBlockStore {
    async fn get(&self, id: &Identifier) -> Result<Option<Bytes>> {
        Ok(self.read().get(id.cid()).cloned())
    }

    async fn has(&self, id: &Identifier) -> Result<bool> {
        Ok(self.read().contains_key(id.cid()))
    }
}

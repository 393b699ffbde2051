//! Block source abstraction
//!
//! The explorer only ever reads blocks. Where the bytes come from (memory, a
//! CAR file, a remote node) is up to the [`BlockSource`] implementation.

use crate::error::Result;
use crate::identifier::Identifier;
use bytes::Bytes;

/// Async read-only block access
///
/// Provides identifier-keyed block lookup for the resolution engine.
/// Implementations might use:
/// - In-memory BTreeMap ([`MemoryBlockStore`])
/// - CAR file ([`CarBlockStore`])
/// - A local blockstore or remote gateway (user-provided)
///
/// # Not found vs. failure
///
/// `Ok(None)` means the source does not have the block. `Err` is reserved for
/// the source itself failing (I/O, network), and is surfaced to the caller
/// unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use ipld_explorer::storage::{BlockSource, MemoryBlockStore};
/// use ipld_explorer::multicodec::RAW;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = MemoryBlockStore::new();
/// let id = storage.put(RAW, &b"hello world"[..])?;
///
/// if let Some(retrieved) = storage.get(&id).await? {
///     assert_eq!(&retrieved[..], b"hello world");
/// }
/// # Ok(())
/// # }
/// ```
#[trait_variant::make(Send)]
pub trait BlockSource {
    /// Get a block by identifier
    ///
    /// Returns `None` if the block is not found.
    async fn get(&self, id: &Identifier) -> Result<Option<Bytes>>;

    /// Check if a block exists without retrieving it
    async fn has(&self, id: &Identifier) -> Result<bool>;
}

impl<T: BlockSource + Sync> BlockSource for std::sync::Arc<T> {
    async fn get(&self, id: &Identifier) -> Result<Option<Bytes>> {
        self.as_ref().get(id).await
    }

    async fn has(&self, id: &Identifier) -> Result<bool> {
        self.as_ref().has(id).await
    }
}

pub mod car;
pub mod memory;

pub use car::CarBlockStore;
pub use memory::MemoryBlockStore;

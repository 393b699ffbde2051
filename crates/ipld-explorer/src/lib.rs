//! Path resolution over content-addressed IPLD graphs
//!
//! This crate resolves human-supplied paths such as `bafy.../a/b/c` against a
//! merkle graph of independently addressed blocks, crossing from block to
//! block wherever the path runs into a link.
//!
//! - **Identifiers**: CIDs that remember the multibase they were written in
//! - **Paths**: `<cid-or-name>/a/b`, `/ipfs/<cid>/...`, `/ipns/<name>/...`
//! - **Codecs**: pluggable per-format resolvers behind a lazily-loading registry
//! - **Block sources**: pluggable read-only storage, with in-memory and CAR-backed implementations
//! - **Explorer**: `resolve`, `get` and `tree` on top of all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use ipld_explorer::{Explorer, MemoryBlockStore, TreeOptions};
//! use ipld_explorer::multicodec::DAG_CBOR;
//! use ipld_core::ipld;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = MemoryBlockStore::new();
//! let leaf = storage.put(DAG_CBOR, serde_ipld_dagcbor::to_vec(&ipld!({ "b": 42 }))?)?;
//! let root = storage.put(DAG_CBOR, serde_ipld_dagcbor::to_vec(&ipld!({ "a": *leaf.cid() }))?)?;
//!
//! let explorer = Explorer::new(storage);
//!
//! // Follows the link at `a` into `leaf`
//! let result = explorer.resolve(format!("{}/a/b", root).as_str()).await?;
//! assert_eq!(result.identifier, leaf);
//!
//! // Stays inside `leaf`
//! let value = explorer.get(format!("{}/b", leaf).as_str()).await?;
//!
//! let paths = explorer.tree(root, &TreeOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

/// CAR (Content Addressable aRchive) utilities
pub mod car;
/// Block codecs and the resolver contract
pub mod codec;
pub mod error;
/// Path resolution across blocks
pub mod explorer;
pub mod identifier;
pub mod multicodec;
pub mod names;
pub mod path;
pub mod registry;
/// Block source abstraction
pub mod storage;
pub mod tree;

pub use codec::{Codec, Resolved};
pub use error::{ResolveError, ResolveErrorKind, Result};
pub use explorer::{Explorer, ExplorerOptions, ResolveResult};
pub use identifier::{Identifier, IpldCid};
pub use names::{NameResolver, NoNames, StaticNames};
pub use path::{IpldPath, PathTarget};
pub use registry::CodecRegistry;
pub use storage::{BlockSource, CarBlockStore, MemoryBlockStore};
pub use tree::TreeOptions;

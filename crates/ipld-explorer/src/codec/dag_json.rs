//! DAG-JSON codec

use ipld_core::ipld::Ipld;

use super::{Codec, Resolved, resolve_ipld, tree_ipld};
use crate::error::{CodecError, Result};
use crate::path::IpldPath;
use crate::tree::TreeOptions;

/// Format tag for DAG-JSON
pub const FORMAT: &str = "dag-json";

/// Resolver for DAG-JSON blocks; `{"/": "<cid>"}` decodes to a link
#[derive(Debug, Clone, Copy, Default)]
pub struct DagJsonCodec;

impl DagJsonCodec {
    /// Decode a block into the IPLD data model
    pub fn decode(block: &[u8]) -> Result<Ipld> {
        serde_ipld_dagjson::from_slice(block).map_err(|e| {
            CodecError::Decode {
                format: FORMAT.into(),
                source: Box::new(e),
            }
            .into()
        })
    }
}

impl Codec for DagJsonCodec {
    fn format(&self) -> &str {
        FORMAT
    }

    fn resolve(&self, block: &[u8], path: &IpldPath) -> Result<Resolved> {
        resolve_ipld(&Self::decode(block)?, path)
    }

    fn tree(&self, block: &[u8], path: &IpldPath, options: &TreeOptions) -> Result<Vec<String>> {
        tree_ipld(&Self::decode(block)?, path, options)
    }
}

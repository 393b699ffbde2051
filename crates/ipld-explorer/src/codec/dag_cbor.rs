//! DAG-CBOR codec

use ipld_core::ipld::Ipld;

use super::{Codec, Resolved, resolve_ipld, tree_ipld};
use crate::error::{CodecError, Result};
use crate::path::IpldPath;
use crate::tree::TreeOptions;

/// Format tag for DAG-CBOR
pub const FORMAT: &str = "dag-cbor";

/// Resolver for DAG-CBOR blocks
///
/// Decoding goes through `serde_ipld_dagcbor`; CBOR tag 42 becomes a link.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagCborCodec;

impl DagCborCodec {
    /// Decode a block into the IPLD data model
    pub fn decode(block: &[u8]) -> Result<Ipld> {
        serde_ipld_dagcbor::from_slice(block).map_err(|e| {
            CodecError::Decode {
                format: FORMAT.into(),
                source: Box::new(e),
            }
            .into()
        })
    }
}

impl Codec for DagCborCodec {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveErrorKind;
    use ipld_core::ipld;

    #[test]
    fn test_resolve_encoded_block() {
        let block = serde_ipld_dagcbor::to_vec(&ipld!({ "a": { "b": 42 } })).unwrap();
        let resolved = DagCborCodec.resolve(&block, &IpldPath::parse("a/b")).unwrap();
        assert_eq!(resolved, Resolved::value(Ipld::Integer(42)));
    }

    #[test]
    fn test_malformed_block() {
        let err = DagCborCodec
            .resolve(&[0xff, 0x00, 0x13], &IpldPath::root())
            .unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::Decode);
        assert_eq!(err.format(), Some(FORMAT));
    }
}

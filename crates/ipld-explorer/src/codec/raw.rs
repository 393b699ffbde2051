//! Raw codec: the block is an opaque byte string

use ipld_core::ipld::Ipld;

use super::{Codec, Resolved};
use crate::error::{CodecError, Result};
use crate::path::IpldPath;
use crate::tree::TreeOptions;

/// Format tag for raw blocks
pub const FORMAT: &str = "raw";

/// Resolver for raw blocks
///
/// The only valid path is the empty one, which yields the bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    fn format(&self) -> &str {
        FORMAT
    }

    fn resolve(&self, block: &[u8], path: &IpldPath) -> Result<Resolved> {
        match path.segments().first() {
            None => Ok(Resolved::value(Ipld::Bytes(block.to_vec()))),
            Some(segment) => Err(CodecError::NotTraversable {
                segment: segment.clone(),
                kind: "bytes",
            }
            .into()),
        }
    }

    fn tree(&self, _block: &[u8], path: &IpldPath, _options: &TreeOptions) -> Result<Vec<String>> {
        match path.segments().first() {
            None => Ok(Vec::new()),
            Some(segment) => Err(CodecError::NoSuchSegment {
                segment: segment.clone(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_has_no_structure() {
        let resolved = RawCodec.resolve(b"hello", &IpldPath::root()).unwrap();
        assert_eq!(resolved, Resolved::value(Ipld::Bytes(b"hello".to_vec())));

        let err = RawCodec.resolve(b"hello", &IpldPath::parse("0")).unwrap_err();
        assert_eq!(err.segment(), Some("0"));

        let paths = RawCodec
            .tree(b"hello", &IpldPath::root(), &TreeOptions::default())
            .unwrap();
        assert!(paths.is_empty());
    }
}

//! DAG-PB codec

use ipld_core::ipld::Ipld;

use super::{Codec, Resolved, resolve_ipld, tree_ipld};
use crate::error::{CodecError, Result};
use crate::path::IpldPath;
use crate::tree::TreeOptions;

/// Format tag for DAG-PB
pub const FORMAT: &str = "dag-pb";

/// Resolver for DAG-PB blocks
///
/// Blocks decode to `{"Data": bytes, "Links": [{"Hash", "Name", "Tsize"}]}`
/// and are walked like any other IPLD value (`Links/0/Hash`). A first segment
/// that is neither `Data` nor `Links` is looked up as a link name, so
/// `<dir>/readme.md` steps straight into the linked block.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagPbCodec;

impl DagPbCodec {
    /// Decode a block into the IPLD data model
    pub fn decode(block: &[u8]) -> Result<Ipld> {
        ipld_dagpb::to_ipld(block).map_err(|e| {
            CodecError::Decode {
                format: FORMAT.into(),
                source: Box::new(e),
            }
            .into()
        })
    }
}

/// Hash of the first link called `name`
fn named_link<'a>(node: &'a Ipld, name: &str) -> Option<&'a Ipld> {
    let Ipld::List(links) = node.get("Links").ok()?? else {
        return None;
    };
    links
        .iter()
        .find(|link| matches!(link.get("Name"), Ok(Some(Ipld::String(n))) if n == name))
        .and_then(|link| link.get("Hash").ok().flatten())
}

impl Codec for DagPbCodec {
    fn format(&self) -> &str {
        FORMAT
    }

    fn resolve(&self, block: &[u8], path: &IpldPath) -> Result<Resolved> {
        let node = Self::decode(block)?;

        if let Some(first) = path.first().filter(|s| !matches!(*s, "Data" | "Links")) {
            if let Some(Ipld::Link(cid)) = named_link(&node, first) {
                return Ok(Resolved::link(*cid, path.skip(1)));
            }
        }

        resolve_ipld(&node, path)
    }

    fn tree(&self, block: &[u8], path: &IpldPath, options: &TreeOptions) -> Result<Vec<String>> {
        tree_ipld(&Self::decode(block)?, path, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveErrorKind;
    use crate::identifier::{IpldCid, compute_cid};
    use crate::multicodec::RAW;
    use ipld_core::ipld;

    fn directory() -> (Vec<u8>, IpldCid) {
        let file = compute_cid(RAW, b"# hello").unwrap();
        let node = ipld!({
            "Data": Ipld::Bytes(vec![8, 1]),
            "Links": [{ "Hash": file, "Name": "readme.md", "Tsize": 7 }],
        });
        (ipld_dagpb::from_ipld(&node).unwrap(), file)
    }

    #[test]
    fn test_resolve_structural_path() {
        let (block, file) = directory();
        let resolved = DagPbCodec
            .resolve(&block, &IpldPath::parse("Links/0/Hash"))
            .unwrap();
        assert_eq!(resolved, Resolved::value(Ipld::Link(file)));

        let resolved = DagPbCodec.resolve(&block, &IpldPath::parse("Data")).unwrap();
        assert_eq!(resolved, Resolved::value(Ipld::Bytes(vec![8, 1])));
    }

    #[test]
    fn test_resolve_link_by_name() {
        let (block, file) = directory();
        let resolved = DagPbCodec
            .resolve(&block, &IpldPath::parse("readme.md/more"))
            .unwrap();
        assert_eq!(resolved, Resolved::link(file, IpldPath::parse("more")));
    }

    #[test]
    fn test_unknown_name() {
        let (block, _) = directory();
        let err = DagPbCodec
            .resolve(&block, &IpldPath::parse("missing.md"))
            .unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::InvalidPath);
        assert_eq!(err.segment(), Some("missing.md"));
    }

    #[test]
    fn test_tree() {
        let (block, _) = directory();
        let paths = DagPbCodec
            .tree(&block, &IpldPath::root(), &TreeOptions::new().recursive(true).build())
            .unwrap();
        assert_eq!(
            paths,
            vec!["Data", "Links", "Links/0", "Links/0/Hash", "Links/0/Name", "Links/0/Tsize"]
        );
    }

    #[test]
    fn test_malformed_block() {
        let err = DagPbCodec
            .resolve(&[0xff, 0xff, 0xff], &IpldPath::root())
            .unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::Decode);
        assert_eq!(err.format(), Some(FORMAT));
    }
}

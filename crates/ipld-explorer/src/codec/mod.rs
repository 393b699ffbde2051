//! Block codecs and the contract they satisfy
//!
//! A [`Codec`] knows how to decode one block format far enough to walk a path
//! through it and to list what is inside. Codecs never fetch blocks: when a
//! path runs into a link, the codec stops there and reports the link together
//! with whatever part of the path it could not consume.
//!
//! # Contract
//!
//! - [`Codec::resolve`] consumes as much of the path as the block allows. A
//!   non-empty [`Resolved::remainder`] is only valid when [`Resolved::value`]
//!   is a link; the explorer rejects anything else instead of asking the same
//!   block again.
//! - [`Codec::tree`] never crosses into linked blocks.
//!
//! Built-in codecs operate on the [`Ipld`] data model and share the navigation
//! helpers in this module.

use std::collections::BTreeMap;

use ipld_core::ipld::Ipld;
use smol_str::SmolStr;

use crate::error::{CodecError, Result};
use crate::identifier::{Identifier, IpldCid};
use crate::path::IpldPath;
use crate::tree::{self, TreeOptions};

pub mod dag_cbor;
pub mod dag_json;
pub mod dag_pb;
pub mod raw;

pub use dag_cbor::DagCborCodec;
pub use dag_json::DagJsonCodec;
pub use dag_pb::DagPbCodec;
pub use raw::RawCodec;

/// Outcome of resolving a path inside one block
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Value reached; a link when `remainder` is non-empty
    pub value: Ipld,
    /// Part of the path that lies beyond this block
    pub remainder: IpldPath,
}

impl Resolved {
    /// Fully resolved value
    pub fn value(value: Ipld) -> Self {
        Self {
            value,
            remainder: IpldPath::root(),
        }
    }

    /// Link reached with `remainder` still to go
    pub fn link(cid: IpldCid, remainder: IpldPath) -> Self {
        Self {
            value: Ipld::Link(cid),
            remainder,
        }
    }
}

/// Resolver for one block format
pub trait Codec: Send + Sync {
    /// Format tag this codec handles, e.g. `dag-cbor`
    fn format(&self) -> &str;

    /// Walk `path` through the block
    fn resolve(&self, block: &[u8], path: &IpldPath) -> Result<Resolved>;

    /// List paths below `path` inside the block
    fn tree(&self, block: &[u8], path: &IpldPath, options: &TreeOptions) -> Result<Vec<String>>;
}

/// Link target if `value` denotes a link
///
/// Recognises native links and the `{"/": "<cid>"}` marker form.
pub fn as_link(value: &Ipld) -> Option<Identifier> {
    match value {
        Ipld::Link(cid) => Some((*cid).into()),
        Ipld::Map(map) if map.len() == 1 => match map.get("/") {
            Some(Ipld::String(s)) => Identifier::parse(s).ok(),
            _ => None,
        },
        _ => None,
    }
}

/// Short name for the kind of an IPLD value
pub fn kind_of(value: &Ipld) -> &'static str {
    match value {
        Ipld::Null => "null",
        Ipld::Bool(_) => "bool",
        Ipld::Integer(_) => "integer",
        Ipld::Float(_) => "float",
        Ipld::String(_) => "string",
        Ipld::Bytes(_) => "bytes",
        Ipld::List(_) => "list",
        Ipld::Map(_) => "map",
        Ipld::Link(_) => "link",
    }
}

/// Walk `path` through a decoded value, stopping at the first link
pub fn resolve_ipld(root: &Ipld, path: &IpldPath) -> Result<Resolved> {
    let mut current = root;

    for (i, segment) in path.segments().iter().enumerate() {
        if let Some(target) = as_link(current) {
            return Ok(Resolved::link(*target.cid(), path.skip(i)));
        }
        current = child(current, segment)?;
    }

    Ok(Resolved::value(current.clone()))
}

/// Navigate to `path` without crossing links
///
/// Fails with [`CodecError::CrossesLink`] when a link sits in the way.
pub fn locate<'a>(root: &'a Ipld, path: &IpldPath) -> Result<&'a Ipld> {
    let mut current = root;
    for segment in path.segments() {
        if as_link(current).is_some() {
            return Err(CodecError::CrossesLink {
                segment: segment.clone(),
            }
            .into());
        }
        current = child(current, segment)?;
    }
    Ok(current)
}

/// Tree listing over a decoded value
pub fn tree_ipld(root: &Ipld, path: &IpldPath, options: &TreeOptions) -> Result<Vec<String>> {
    let start = locate(root, path)?;
    Ok(tree::enumerate(start, options))
}

fn child<'a>(value: &'a Ipld, segment: &SmolStr) -> std::result::Result<&'a Ipld, CodecError> {
    match value {
        Ipld::Map(map) => map_child(map, segment),
        Ipld::List(list) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| list.get(index))
            .ok_or_else(|| CodecError::NoSuchSegment {
                segment: segment.clone(),
            }),
        other => Err(CodecError::NotTraversable {
            segment: segment.clone(),
            kind: kind_of(other),
        }),
    }
}

fn map_child<'a>(
    map: &'a BTreeMap<String, Ipld>,
    segment: &SmolStr,
) -> std::result::Result<&'a Ipld, CodecError> {
    map.get(segment.as_str())
        .ok_or_else(|| CodecError::NoSuchSegment {
            segment: segment.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveErrorKind;
    use crate::identifier::compute_cid;
    use ipld_core::ipld;

    fn some_cid() -> IpldCid {
        compute_cid(crate::multicodec::DAG_CBOR, b"child").unwrap()
    }

    #[test]
    fn test_resolve_nested_value() {
        let root = ipld!({ "a": { "b": [1, 2, { "c": "deep" }] } });
        let resolved = resolve_ipld(&root, &IpldPath::parse("a/b/2/c")).unwrap();
        assert_eq!(resolved, Resolved::value(Ipld::String("deep".into())));
    }

    #[test]
    fn test_resolve_stops_at_link() {
        let cid = some_cid();
        let root = ipld!({ "a": { "next": cid } });

        let resolved = resolve_ipld(&root, &IpldPath::parse("a/next/x/y")).unwrap();
        assert_eq!(resolved.value, Ipld::Link(cid));
        assert_eq!(resolved.remainder.to_string(), "x/y");

        // path ending on the link itself
        let resolved = resolve_ipld(&root, &IpldPath::parse("a/next")).unwrap();
        assert_eq!(resolved, Resolved::value(Ipld::Link(cid)));
    }

    #[test]
    fn test_marker_map_is_link() {
        let cid = some_cid();
        let marker = ipld!({ "/": cid.to_string() });
        assert_eq!(as_link(&marker).map(|id| *id.cid()), Some(cid));

        let root = ipld!({ "a": { "/": cid.to_string() } });
        let resolved = resolve_ipld(&root, &IpldPath::parse("a/b")).unwrap();
        assert_eq!(resolved.value, Ipld::Link(cid));
        assert_eq!(resolved.remainder.to_string(), "b");

        assert!(as_link(&ipld!({ "/": "garbage" })).is_none());
        assert!(as_link(&ipld!({ "/": cid.to_string(), "x": 1 })).is_none());
    }

    #[test]
    fn test_missing_and_scalar_segments() {
        let root = ipld!({ "a": 1, "l": [true] });

        let err = resolve_ipld(&root, &IpldPath::parse("missing")).unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::InvalidPath);
        assert_eq!(err.segment(), Some("missing"));

        let err = resolve_ipld(&root, &IpldPath::parse("a/b")).unwrap_err();
        assert_eq!(err.segment(), Some("b"));

        let err = resolve_ipld(&root, &IpldPath::parse("l/1")).unwrap_err();
        assert_eq!(err.segment(), Some("1"));
    }

    #[test]
    fn test_locate_refuses_links() {
        let root = ipld!({ "a": some_cid() });
        assert!(locate(&root, &IpldPath::parse("a")).is_ok());
        let err = locate(&root, &IpldPath::parse("a/b")).unwrap_err();
        assert_eq!(err.segment(), Some("b"));
    }
}

//! Link-following state for a single `resolve` call
//!
//! The walk holds which block is live and which path was handed to it. It is
//! advanced with the output of a codec and decides, without doing any I/O,
//! whether resolution is finished or which block to fetch next.

use std::fmt;

use serde::Serialize;

use crate::codec::{Resolved, as_link, kind_of};
use crate::error::{ResolveError, Result};
use crate::identifier::Identifier;
use crate::path::IpldPath;

/// Block that owns a resolved path, plus the path inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveResult {
    /// Identifier of the owning block
    pub identifier: Identifier,
    /// Path within that block, empty when the path ended on a link
    #[serde(serialize_with = "serialize_path")]
    pub remainder_path: IpldPath,
}

fn serialize_path<S: serde::Serializer>(
    path: &IpldPath,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(path)
}

impl fmt::Display for ResolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remainder_path.is_end() {
            write!(f, "{}", self.identifier)
        } else {
            write!(f, "{}/{}", self.identifier, self.remainder_path)
        }
    }
}

/// Where the walk goes after a resolve step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    /// Fetch `identifier` and resolve `path` inside it
    Follow {
        /// Block to fetch next
        identifier: Identifier,
        /// Path to resolve inside it
        path: IpldPath,
    },
    /// Resolution finished
    Done(ResolveResult),
}

/// Live position of a resolution
#[derive(Debug, Clone)]
pub struct Walk {
    current: Identifier,
    path: IpldPath,
    hops: usize,
    max_hops: usize,
}

impl Walk {
    /// Start at `identifier` with `path` still to resolve
    pub fn new(identifier: Identifier, path: IpldPath, max_hops: usize) -> Self {
        Self {
            current: identifier,
            path,
            hops: 0,
            max_hops,
        }
    }

    /// Block currently being resolved
    pub fn current(&self) -> &Identifier {
        &self.current
    }

    /// Path handed to the current block
    pub fn path(&self) -> &IpldPath {
        &self.path
    }

    /// Links followed so far
    pub fn hops(&self) -> usize {
        self.hops
    }

    /// Feed the codec's answer for the current block
    ///
    /// - empty remainder: done. A link value resolves to its target with an
    ///   empty path; any other value resolves to the current block and the
    ///   path that was handed to it.
    /// - non-empty remainder with a link value: follow the link.
    /// - non-empty remainder with anything else: the codec broke its contract
    ///   (it stopped without reaching a link), which fails with `InvalidPath`.
    pub fn advance(&mut self, resolved: Resolved) -> Result<WalkState> {
        let link = as_link(&resolved.value);

        if resolved.remainder.is_end() {
            let result = match link {
                Some(target) => ResolveResult {
                    identifier: target,
                    remainder_path: IpldPath::root(),
                },
                None => ResolveResult {
                    identifier: self.current,
                    remainder_path: self.path.clone(),
                },
            };
            return Ok(WalkState::Done(result));
        }

        let Some(target) = link else {
            let segment = resolved.remainder.first().unwrap_or_default();
            return Err(ResolveError::invalid_path(format!(
                "resolver stopped at a {} with {} left",
                kind_of(&resolved.value),
                resolved.remainder
            ))
            .with_identifier(self.current)
            .with_segment(segment));
        };

        if self.hops >= self.max_hops {
            return Err(ResolveError::link_limit(self.max_hops).with_identifier(self.current));
        }

        self.hops += 1;
        self.current = target;
        self.path = resolved.remainder;

        Ok(WalkState::Follow {
            identifier: self.current,
            path: self.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveErrorKind;
    use crate::identifier::compute_cid;
    use crate::multicodec::DAG_CBOR;
    use ipld_core::ipld::Ipld;

    fn id(seed: &[u8]) -> Identifier {
        compute_cid(DAG_CBOR, seed).unwrap().into()
    }

    #[test]
    fn test_value_without_remainder_finishes_in_place() {
        let start = id(b"start");
        let mut walk = Walk::new(start, IpldPath::parse("a/b"), 8);

        let state = walk.advance(Resolved::value(Ipld::Integer(1))).unwrap();
        assert_eq!(
            state,
            WalkState::Done(ResolveResult {
                identifier: start,
                remainder_path: IpldPath::parse("a/b"),
            })
        );
    }

    #[test]
    fn test_link_without_remainder_finishes_at_target() {
        let target = id(b"target");
        let mut walk = Walk::new(id(b"start"), IpldPath::parse("a"), 8);

        let state = walk
            .advance(Resolved::value(Ipld::Link(*target.cid())))
            .unwrap();
        assert_eq!(
            state,
            WalkState::Done(ResolveResult {
                identifier: target,
                remainder_path: IpldPath::root(),
            })
        );
    }

    #[test]
    fn test_link_with_remainder_follows() {
        let target = id(b"target");
        let mut walk = Walk::new(id(b"start"), IpldPath::parse("a/b/c"), 8);

        let state = walk
            .advance(Resolved::link(*target.cid(), IpldPath::parse("b/c")))
            .unwrap();
        assert_eq!(
            state,
            WalkState::Follow {
                identifier: target,
                path: IpldPath::parse("b/c"),
            }
        );
        assert_eq!(walk.current(), &target);
        assert_eq!(walk.hops(), 1);

        // final block answers with a plain value
        let state = walk.advance(Resolved::value(Ipld::Integer(42))).unwrap();
        assert_eq!(
            state,
            WalkState::Done(ResolveResult {
                identifier: target,
                remainder_path: IpldPath::parse("b/c"),
            })
        );
    }

    #[test]
    fn test_non_link_with_remainder_is_rejected() {
        let start = id(b"start");
        let mut walk = Walk::new(start, IpldPath::parse("a/b"), 8);

        let err = walk
            .advance(Resolved {
                value: Ipld::String("stuck".into()),
                remainder: IpldPath::parse("b"),
            })
            .unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::InvalidPath);
        assert_eq!(err.segment(), Some("b"));
        assert_eq!(err.identifier(), Some(&start));
    }

    #[test]
    fn test_hop_limit() {
        let target = id(b"loop");
        let mut walk = Walk::new(target, IpldPath::parse("x"), 2);

        for _ in 0..2 {
            walk.advance(Resolved::link(*target.cid(), IpldPath::parse("x")))
                .unwrap();
        }
        let err = walk
            .advance(Resolved::link(*target.cid(), IpldPath::parse("x")))
            .unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::LinkLimit);
    }

    #[test]
    fn test_display() {
        let target = id(b"target");
        let result = ResolveResult {
            identifier: target,
            remainder_path: IpldPath::parse("b"),
        };
        assert_eq!(result.to_string(), format!("{}/b", target));
    }
}

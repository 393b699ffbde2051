//! Path parsing
//!
//! A user path looks like `<cid-or-name>/a/b/c`, optionally behind one of the
//! `/ipfs/`, `/ipld/` or `/ipns/` namespaces. [`split`] separates the leading
//! token from the remaining [`IpldPath`].

use std::fmt;

use smol_str::SmolStr;

use crate::error::{ResolveError, Result};
use crate::identifier::{Identifier, IpldCid};

/// Sequence of path segments inside (or across) blocks
///
/// Empty segments are never stored, so `""`, `"/"` and `"a//b/"` normalise to
/// `[]`, `[]` and `["a", "b"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IpldPath(Vec<SmolStr>);

impl IpldPath {
    /// The empty path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a slash-delimited path
    pub fn parse(s: &str) -> Self {
        Self(
            s.split('/')
                .filter(|seg| !seg.is_empty())
                .map(SmolStr::new)
                .collect(),
        )
    }

    /// Segments in order
    pub fn segments(&self) -> &[SmolStr] {
        &self.0
    }

    /// First segment, if any
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(SmolStr::as_str)
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is left to resolve
    pub fn is_end(&self) -> bool {
        self.0.is_empty()
    }

    /// Alias for [`IpldPath::is_end`]
    pub fn is_empty(&self) -> bool {
        self.is_end()
    }

    /// Path with the first `n` segments removed
    pub fn skip(&self, n: usize) -> Self {
        Self(self.0.iter().skip(n).cloned().collect())
    }
}

impl fmt::Display for IpldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(seg)?;
        }
        Ok(())
    }
}

impl From<&str> for IpldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// What a resolution call is aimed at: a typed identifier or a path string
#[derive(Debug, Clone)]
pub enum PathTarget<'a> {
    /// Already an identifier; no string parsing happens
    Identifier(Identifier),
    /// A user path such as `bafy.../a/b`
    Path(&'a str),
}

impl From<Identifier> for PathTarget<'_> {
    fn from(id: Identifier) -> Self {
        PathTarget::Identifier(id)
    }
}

impl From<IpldCid> for PathTarget<'_> {
    fn from(cid: IpldCid) -> Self {
        PathTarget::Identifier(cid.into())
    }
}

impl<'a> From<&'a str> for PathTarget<'a> {
    fn from(s: &'a str) -> Self {
        PathTarget::Path(s)
    }
}

impl<'a> From<&'a String> for PathTarget<'a> {
    fn from(s: &'a String) -> Self {
        PathTarget::Path(s.as_str())
    }
}

/// Leading token of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// A parsed content identifier
    Identifier(Identifier),
    /// A human-readable name still to be resolved
    Name(SmolStr),
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Identifier(id) => write!(f, "{}", id),
            Head::Name(name) => f.write_str(name),
        }
    }
}

/// Result of [`split`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    /// Identifier or name the path starts from
    pub head: Head,
    /// Remaining segments, relative to the head
    pub rest: IpldPath,
}

/// Split a target into its head and the remaining path
///
/// Any non-empty head that does not parse as an identifier is treated as a
/// name. Whether it actually resolves is decided later by a
/// [`NameResolver`](crate::names::NameResolver).
pub fn split<'a>(target: impl Into<PathTarget<'a>>) -> Result<SplitPath> {
    let input = match target.into() {
        PathTarget::Identifier(id) => {
            return Ok(SplitPath {
                head: Head::Identifier(id),
                rest: IpldPath::root(),
            });
        }
        PathTarget::Path(s) => s.trim(),
    };

    let mut force_name = false;
    let mut body = input;
    if let Some(stripped) = input.strip_prefix('/') {
        body = stripped.trim_start_matches('/');
        if let Some(rest) = namespace(body, "ipns") {
            force_name = true;
            body = rest;
        } else if let Some(rest) = namespace(body, "ipfs").or_else(|| namespace(body, "ipld")) {
            body = rest;
        }
    }

    let (head, rest) = match body.split_once('/') {
        Some((head, rest)) => (head, rest),
        None => (body, ""),
    };

    if head.is_empty() {
        return Err(ResolveError::invalid_path(format!("no identifier in path {:?}", input)));
    }

    let head = match Identifier::parse(head) {
        Ok(id) if !force_name => Head::Identifier(id),
        _ => Head::Name(SmolStr::new(head)),
    };

    Ok(SplitPath {
        head,
        rest: IpldPath::parse(rest),
    })
}

fn namespace<'s>(body: &'s str, ns: &str) -> Option<&'s str> {
    let rest = body.strip_prefix(ns)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

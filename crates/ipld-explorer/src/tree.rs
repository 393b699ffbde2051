//! Tree enumeration inside a single block

use bon::Builder;
use ipld_core::ipld::Ipld;

use crate::codec::as_link;

/// Options for listing the paths below a node
///
/// - `recursive`: descend into nested maps and lists instead of stopping at
///   the immediate children.
/// - `values`: include entries whose value is terminal (scalars, bytes,
///   links). When false only structural entries (maps and lists) are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(start_fn = new)]
pub struct TreeOptions {
    /// Enumerate nested children transitively
    #[builder(default)]
    pub recursive: bool,
    /// Include terminal values, not just structural keys
    #[builder(default = true)]
    pub values: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self::new().build()
    }
}

/// List paths below `start`, relative to it
///
/// Depth-first, parents before children, map keys in sorted order, list
/// entries by index. Links are leaves. Map keys that no path can reach (empty,
/// or containing `/`) are skipped along with everything below them, so every
/// listed path is unique and addresses the entry it names.
pub fn enumerate(start: &Ipld, options: &TreeOptions) -> Vec<String> {
    let mut out = Vec::new();
    walk(start, None, options, &mut out);
    out
}

fn walk(value: &Ipld, prefix: Option<&str>, options: &TreeOptions, out: &mut Vec<String>) {
    if as_link(value).is_some() {
        return;
    }

    let children: Vec<(String, &Ipld)> = match value {
        Ipld::Map(map) => map
            .iter()
            .filter(|(k, _)| is_addressable(k))
            .map(|(k, v)| (k.clone(), v))
            .collect(),
        Ipld::List(list) => list
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return,
    };

    for (segment, child) in children {
        let path = match prefix {
            Some(prefix) => format!("{}/{}", prefix, segment),
            None => segment,
        };
        let structural = is_structural(child);

        if options.values || structural {
            out.push(path.clone());
        }
        if options.recursive && structural {
            walk(child, Some(&path), options, out);
        }
    }
}

fn is_addressable(key: &str) -> bool {
    !key.is_empty() && !key.contains('/')
}

fn is_structural(value: &Ipld) -> bool {
    matches!(value, Ipld::Map(_) | Ipld::List(_)) && as_link(value).is_none()
}

//! Name resolution for path heads
//!
//! Human-readable names (`docs.example.org/...`) are turned into identifier
//! strings by a pluggable [`NameResolver`]. The explorer does not prescribe a
//! naming scheme; DNSLink, IPNS or a local alias table all fit behind the trait.

use std::collections::BTreeMap;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::{ResolveError, Result};
use crate::identifier::Identifier;
use crate::path::Head;

/// Trait for name resolution, for pluggable implementations.
#[trait_variant::make(Send)]
pub trait NameResolver {
    /// Resolve a name to an identifier string
    ///
    /// Returns `None` when the name is unknown. Errors are reserved for
    /// failures of the lookup itself.
    async fn resolve_name(&self, name: &str) -> Result<Option<SmolStr>>;

    /// Whether `s` is already a valid identifier string
    fn is_valid_identifier(&self, s: &str) -> bool {
        Identifier::is_valid(s)
    }
}

/// Resolver that knows no names
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    async fn resolve_name(&self, _name: &str) -> Result<Option<SmolStr>> {
        Ok(None)
    }
}

/// Fixed name → identifier table
#[derive(Debug, Clone, Default)]
pub struct StaticNames {
    names: Arc<BTreeMap<SmolStr, SmolStr>>,
}

impl StaticNames {
    /// Create from `(name, identifier)` pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<SmolStr>,
    {
        Self {
            names: Arc::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameResolver for StaticNames {
    async fn resolve_name(&self, name: &str) -> Result<Option<SmolStr>> {
        Ok(self.names.get(name).cloned())
    }
}

/// Turn a path head into an identifier, consulting `names` for names
pub async fn resolve_head<N: NameResolver + Sync>(names: &N, head: Head) -> Result<Identifier> {
    match head {
        Head::Identifier(id) => Ok(id),
        Head::Name(name) => {
            let target = names.resolve_name(&name).await?.ok_or_else(|| {
                ResolveError::invalid_path(format!("cannot resolve name {}", name))
                    .with_segment(name.clone())
                    .with_help("the head of a path must be a CID or a name known to the name resolver")
            })?;

            #[cfg(feature = "tracing")]
            tracing::debug!(%name, %target, "resolved name");

            if !names.is_valid_identifier(&target) {
                return Err(ResolveError::invalid_identifier(target.as_str())
                    .with_context(format!("name {} points at invalid cid {}", name, target)));
            }
            Identifier::parse(&target)
        }
    }
}

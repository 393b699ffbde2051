//! Path resolution across blocks
//!
//! [`Explorer`] ties together a [`BlockSource`], a [`CodecRegistry`] and a
//! [`NameResolver`]:
//!
//! - [`Explorer::resolve`] follows links until the path is used up and reports
//!   which block owns the result.
//! - [`Explorer::get`] answers from the addressed block only.
//! - [`Explorer::tree`] lists paths inside the addressed block.

use std::sync::Arc;

use bon::Builder;
use bytes::Bytes;
use ipld_core::ipld::Ipld;

use crate::codec::Codec;
use crate::error::{CodecError, ResolveError, Result};
use crate::identifier::Identifier;
use crate::names::{NameResolver, NoNames, resolve_head};
use crate::path::{IpldPath, PathTarget, split};
use crate::registry::CodecRegistry;
use crate::storage::BlockSource;
use crate::tree::TreeOptions;

pub mod walk;

pub use walk::{ResolveResult, Walk, WalkState};

/// Default bound on links followed by one `resolve` call
pub const DEFAULT_MAX_HOPS: usize = 4096;

/// Explorer configuration
#[derive(Debug, Clone, Builder)]
#[builder(start_fn = new)]
pub struct ExplorerOptions {
    /// Links one `resolve` call may follow before giving up
    #[builder(default = DEFAULT_MAX_HOPS)]
    pub max_hops: usize,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self::new().build()
    }
}

/// Resolves paths over a block source
///
/// Holds no mutable state; one explorer can serve many concurrent calls.
///
/// # Example
///
/// ```rust,ignore
/// use ipld_explorer::{Explorer, MemoryBlockStore};
///
/// # async fn example() -> ipld_explorer::Result<()> {
/// let explorer = Explorer::new(MemoryBlockStore::new());
/// let result = explorer.resolve("bafy.../a/b").await?;
/// println!("{} owns {}", result.identifier, result.remainder_path);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Explorer<S, N = NoNames> {
    blocks: S,
    names: N,
    registry: Arc<CodecRegistry>,
    options: ExplorerOptions,
}

impl<S: BlockSource> Explorer<S, NoNames> {
    /// Explorer with the built-in codecs and no name resolution
    pub fn new(blocks: S) -> Self {
        Self {
            blocks,
            names: NoNames,
            registry: Arc::new(CodecRegistry::default()),
            options: ExplorerOptions::default(),
        }
    }
}

impl<S, N> Explorer<S, N>
where
    S: BlockSource + Sync,
    N: NameResolver + Sync,
{
    /// Swap in a name resolver
    pub fn with_names<M: NameResolver + Sync>(self, names: M) -> Explorer<S, M> {
        Explorer {
            blocks: self.blocks,
            names,
            registry: self.registry,
            options: self.options,
        }
    }

    /// Use a different codec registry
    pub fn with_registry(mut self, registry: Arc<CodecRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the options
    pub fn with_options(mut self, options: ExplorerOptions) -> Self {
        self.options = options;
        self
    }

    /// The codec registry in use
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// The block source in use
    pub fn blocks(&self) -> &S {
        &self.blocks
    }

    /// Turn a target into the starting identifier and the path below it
    ///
    /// Names are looked up through the name resolver.
    pub async fn locate<'a>(&self, target: impl Into<PathTarget<'a>>) -> Result<(Identifier, IpldPath)> {
        let split = split(target)?;
        let identifier = resolve_head(&self.names, split.head).await?;
        Ok((identifier, split.rest))
    }

    /// Resolve a path to the block that owns it, following links
    ///
    /// Returns the owning block and the path inside it. When the path ends
    /// exactly on a link, the result is the link's target with an empty path.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn resolve<'a>(&self, target: impl Into<PathTarget<'a>>) -> Result<ResolveResult> {
        let (start, path) = self.locate(target).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(cid = %start, path = %path, "resolve");

        let mut walk = Walk::new(start, path, self.options.max_hops);

        loop {
            let (codec, block) = self.load(walk.current()).await?;
            let resolved = codec
                .resolve(&block, walk.path())
                .map_err(|e| attach_identifier(e, walk.current()))?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                cid = %walk.current(),
                path = %walk.path(),
                remainder = %resolved.remainder,
                "resolved block"
            );

            match walk.advance(resolved)? {
                WalkState::Follow { .. } => continue,
                WalkState::Done(result) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        cid = %result.identifier,
                        remainder = %result.remainder_path,
                        hops = walk.hops(),
                        "resolve finished"
                    );
                    return Ok(result);
                }
            }
        }
    }

    /// Decoded value at a path inside the addressed block
    ///
    /// Never follows links: a path that continues past a link fails with
    /// `InvalidPath`. A path that ends on a link yields the link itself.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn get<'a>(&self, target: impl Into<PathTarget<'a>>) -> Result<Ipld> {
        let (identifier, path) = self.locate(target).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(cid = %identifier, path = %path, "get");

        let (codec, block) = self.load(&identifier).await?;
        let resolved = codec
            .resolve(&block, &path)
            .map_err(|e| attach_identifier(e, &identifier))?;

        if let Some(segment) = resolved.remainder.segments().first() {
            return Err(ResolveError::from(CodecError::CrossesLink {
                segment: segment.clone(),
            })
            .with_identifier(identifier));
        }

        Ok(resolved.value)
    }

    /// Paths below a path inside the addressed block
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn tree<'a>(
        &self,
        target: impl Into<PathTarget<'a>>,
        options: &TreeOptions,
    ) -> Result<Vec<String>> {
        let (identifier, path) = self.locate(target).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            cid = %identifier,
            path = %path,
            recursive = options.recursive,
            values = options.values,
            "tree"
        );

        let (codec, block) = self.load(&identifier).await?;
        codec
            .tree(&block, &path, options)
            .map_err(|e| attach_identifier(e, &identifier))
    }

    /// Pick the codec for a block, then fetch the block
    ///
    /// The codec is looked up first so an unknown format never costs a fetch.
    async fn load(&self, identifier: &Identifier) -> Result<(Arc<dyn Codec>, Bytes)> {
        let codec = self
            .registry
            .get(&identifier.format())
            .map_err(|e| e.with_identifier(*identifier))?;

        let block = self
            .blocks
            .get(identifier)
            .await?
            .ok_or_else(|| ResolveError::block_not_found(*identifier))?;

        Ok((codec, block))
    }
}

fn attach_identifier(err: ResolveError, identifier: &Identifier) -> ResolveError {
    if err.identifier().is_some() {
        err
    } else {
        err.with_identifier(*identifier)
    }
}

//! Format tag → codec registry
//!
//! Codecs are registered as loaders and only materialised the first time their
//! format is requested. Each loader runs at most once for the lifetime of the
//! registry, even when several tasks ask for the same format at the same time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use smol_str::SmolStr;

use crate::codec::{
    Codec, DagCborCodec, DagJsonCodec, DagPbCodec, RawCodec, dag_cbor, dag_json, dag_pb, raw,
};
use crate::error::{ResolveError, Result};

/// Function producing a codec on first use
pub type CodecLoader = Box<dyn Fn() -> Arc<dyn Codec> + Send + Sync>;

struct Entry {
    loader: CodecLoader,
    codec: OnceLock<Arc<dyn Codec>>,
}

impl Entry {
    fn get(&self, _format: &str) -> Arc<dyn Codec> {
        self.codec
            .get_or_init(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!(format = _format, "loading IPLD format");
                (self.loader)()
            })
            .clone()
    }
}

/// Registry of codecs keyed by format tag
///
/// # Example
///
/// ```rust,ignore
/// use ipld_explorer::registry::CodecRegistry;
///
/// let registry = CodecRegistry::default();
/// let codec = registry.get("dag-cbor")?;
/// assert_eq!(codec.format(), "dag-cbor");
/// assert!(registry.get("git-raw").is_err());
/// ```
pub struct CodecRegistry {
    entries: BTreeMap<SmolStr, Entry>,
}

impl CodecRegistry {
    /// Registry with no codecs at all
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registry with the built-in `dag-cbor`, `dag-json`, `dag-pb` and `raw` codecs
    pub fn with_builtins() -> Self {
        Self::empty()
            .with(dag_cbor::FORMAT, || Arc::new(DagCborCodec))
            .with(dag_json::FORMAT, || Arc::new(DagJsonCodec))
            .with(dag_pb::FORMAT, || Arc::new(DagPbCodec))
            .with(raw::FORMAT, || Arc::new(RawCodec))
    }

    /// Register a loader for `format`, replacing any previous one
    pub fn register<F>(&mut self, format: impl Into<SmolStr>, loader: F)
    where
        F: Fn() -> Arc<dyn Codec> + Send + Sync + 'static,
    {
        self.entries.insert(
            format.into(),
            Entry {
                loader: Box::new(loader),
                codec: OnceLock::new(),
            },
        );
    }

    /// Builder-style [`CodecRegistry::register`]
    pub fn with<F>(mut self, format: impl Into<SmolStr>, loader: F) -> Self
    where
        F: Fn() -> Arc<dyn Codec> + Send + Sync + 'static,
    {
        self.register(format, loader);
        self
    }

    /// Codec for `format`, loading it if needed
    pub fn get(&self, format: &str) -> Result<Arc<dyn Codec>> {
        self.entries
            .get(format)
            .map(|entry| entry.get(format))
            .ok_or_else(|| ResolveError::unknown_format(format))
    }

    /// Whether a loader is registered for `format`
    pub fn contains(&self, format: &str) -> bool {
        self.entries.contains_key(format)
    }

    /// Whether the codec for `format` has been materialised
    pub fn is_loaded(&self, format: &str) -> bool {
        self.entries
            .get(format)
            .is_some_and(|entry| entry.codec.get().is_some())
    }

    /// Registered format tags, sorted
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(SmolStr::as_str)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, entry)| (name, entry.codec.get().is_some())),
            )
            .finish()
    }
}

//! Error types for path resolution

use std::error::Error;
use std::fmt;

use smol_str::SmolStr;

use crate::identifier::Identifier;

/// Boxed error type for error sources
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Resolution error with rich diagnostics
///
/// Besides the human-oriented `help`/`context`, the error keeps the offending
/// identifier, path segment and format tag as structured fields so callers can
/// build their own messages.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub struct ResolveError {
    kind: ResolveErrorKind,
    #[source]
    source: Option<BoxError>,
    #[help]
    help: Option<String>,
    context: Option<String>,
    identifier: Option<Identifier>,
    segment: Option<SmolStr>,
    format: Option<SmolStr>,
}

/// Error categories for resolution operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// Path could not be parsed, or does not exist inside a block
    InvalidPath,
    /// String is not a valid content identifier
    InvalidIdentifier,
    /// No codec registered for the identifier's format
    UnknownFormat,
    /// Block source has no block for the identifier
    BlockNotFound,
    /// Block bytes are malformed for the claimed format
    Decode,
    /// Block source failed for a reason other than absence
    Storage,
    /// CAR file operation failed
    Car,
    /// I/O error
    Io,
    /// Too many links followed in one resolution
    LinkLimit,
}

impl ResolveError {
    /// Create a new error with the given kind and optional source
    pub fn new(kind: ResolveErrorKind, source: Option<BoxError>) -> Self {
        Self {
            kind,
            source,
            help: None,
            context: None,
            identifier: None,
            segment: None,
            format: None,
        }
    }

    /// Add a help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add context information to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach the identifier of the block being worked on
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Attach the path segment that could not be handled
    pub fn with_segment(mut self, segment: impl Into<SmolStr>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Attach the format tag involved
    pub fn with_format(mut self, format: impl Into<SmolStr>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ResolveErrorKind {
        &self.kind
    }

    /// Identifier of the block the error relates to, if known
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Offending path segment, if any
    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    /// Offending format tag, if any
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    // Constructors for different error kinds

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::InvalidPath, Some(msg.into().into()))
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(input: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::InvalidIdentifier, None)
            .with_help("identifiers are CIDv0 (Qm...) or multibase-encoded CIDv1 strings")
            .with_context(format!("invalid cid {}", input.into()))
    }

    /// Create an unknown format error
    pub fn unknown_format(format: impl Into<SmolStr>) -> Self {
        let format = format.into();
        Self::new(ResolveErrorKind::UnknownFormat, None)
            .with_context(format!("no resolver found for codec \"{}\"", format))
            .with_format(format)
    }

    /// Create a block not found error
    pub fn block_not_found(identifier: Identifier) -> Self {
        Self::new(ResolveErrorKind::BlockNotFound, None)
            .with_context(format!("block not found: {}", identifier))
            .with_identifier(identifier)
    }

    /// Create a decode error
    pub fn decode(format: impl Into<SmolStr>, source: impl Into<BoxError>) -> Self {
        let format = format.into();
        Self::new(ResolveErrorKind::Decode, Some(source.into()))
            .with_context(format!("malformed {} block", format))
            .with_format(format)
    }

    /// Create a storage error
    pub fn storage(source: impl Error + Send + Sync + 'static) -> Self {
        Self::new(ResolveErrorKind::Storage, Some(Box::new(source)))
    }

    /// Create a CAR file error
    pub fn car(source: impl Error + Send + Sync + 'static) -> Self {
        Self::new(ResolveErrorKind::Car, Some(Box::new(source)))
    }

    /// Create a CAR parse error (alias for car)
    pub fn car_parse(source: impl Error + Send + Sync + 'static) -> Self {
        Self::car(source).with_context("Failed to parse CAR file".to_string())
    }

    /// Create an I/O error
    pub fn io(source: impl Error + Send + Sync + 'static) -> Self {
        Self::new(ResolveErrorKind::Io, Some(Box::new(source)))
    }

    /// Create a link limit error
    pub fn link_limit(max: usize) -> Self {
        Self::new(ResolveErrorKind::LinkLimit, None)
            .with_context(format!("followed more than {} links", max))
            .with_help("raise ExplorerOptions::max_hops if the graph is legitimately this deep")
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;

        if let Some(ctx) = &self.context {
            write!(f, ": {}", ctx)?;
        }

        if let Some(src) = &self.source {
            write!(f, ": {}", src)?;
        }

        Ok(())
    }
}

// Internal granular errors

/// Codec-level errors raised while navigating inside a single block
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CodecError {
    /// Block bytes could not be decoded
    #[error("failed to decode {format} block")]
    Decode {
        /// Format tag of the codec
        format: SmolStr,
        /// Underlying decoder error
        #[source]
        source: BoxError,
    },

    /// Key or index missing from a map or list
    #[error("no such path segment: {segment}")]
    NoSuchSegment {
        /// The missing segment
        segment: SmolStr,
    },

    /// Tried to descend into a scalar value
    #[error("cannot descend into {kind} at segment {segment}")]
    NotTraversable {
        /// The segment that could not be followed
        segment: SmolStr,
        /// Kind of value found there
        kind: &'static str,
    },

    /// Path leads through a link that this block cannot follow
    #[error("path crosses a link at segment {segment}")]
    CrossesLink {
        /// The first segment past the link
        segment: SmolStr,
    },
}

impl From<CodecError> for ResolveError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Decode { format, source } => ResolveError::decode(format, source),
            CodecError::NoSuchSegment { segment } => {
                ResolveError::new(ResolveErrorKind::InvalidPath, None)
                    .with_context(format!("no such path segment: {}", segment))
                    .with_segment(segment)
            }
            CodecError::NotTraversable { segment, kind } => {
                ResolveError::new(ResolveErrorKind::InvalidPath, None)
                    .with_context(format!("cannot descend into {} at {}", kind, segment))
                    .with_segment(segment)
            }
            CodecError::CrossesLink { segment } => {
                ResolveError::new(ResolveErrorKind::InvalidPath, None)
                    .with_context(format!("path crosses a link before {}", segment))
                    .with_help("use resolve to follow links across blocks")
                    .with_segment(segment)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = ResolveError::unknown_format("git-raw");
        assert_eq!(*err.kind(), ResolveErrorKind::UnknownFormat);
        assert_eq!(err.format(), Some("git-raw"));
        assert!(err.to_string().contains("git-raw"));
    }

    #[test]
    fn test_codec_error_keeps_segment() {
        let err: ResolveError = CodecError::NoSuchSegment {
            segment: "missing".into(),
        }
        .into();
        assert_eq!(*err.kind(), ResolveErrorKind::InvalidPath);
        assert_eq!(err.segment(), Some("missing"));
    }
}

//! Content identifiers
//!
//! [`Identifier`] wraps an IPLD CID together with the multibase it was written
//! in, so that printing a parsed identifier gives back the exact string the
//! user typed.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use cid::Version;
use multibase::Base;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use smol_str::{SmolStr, format_smolstr};

use crate::error::{ResolveError, ResolveErrorKind, Result};
use crate::multicodec;

pub use cid::Cid as IpldCid;

/// Base used when printing a CIDv1 that was not parsed from a string
pub const DEFAULT_BASE: Base = Base::Base32Lower;

/// A content address: format tag plus digest
///
/// Equality, ordering and hashing only look at the CID. The base is kept for
/// display.
#[derive(Debug, Clone, Copy)]
pub struct Identifier {
    cid: IpldCid,
    base: Base,
}

impl Identifier {
    /// Parse a canonical identifier string
    ///
    /// Accepts CIDv0 (`Qm...`, base58btc) and CIDv1 in any multibase.
    /// A CIDv0 behind a multibase prefix (`zQm...`) is rejected, since it
    /// could not be printed back the way it was written.
    pub fn parse(s: &str) -> Result<Self> {
        let cid = IpldCid::try_from(s).map_err(|_| ResolveError::invalid_identifier(s))?;
        let base = match cid.version() {
            Version::V0 if s.starts_with("Qm") => Base::Base58Btc,
            Version::V0 => {
                return Err(ResolveError::invalid_identifier(s)
                    .with_help("CIDv0 identifiers are written without a multibase prefix"));
            }
            Version::V1 => s
                .chars()
                .next()
                .and_then(|code| Base::from_code(code).ok())
                .ok_or_else(|| ResolveError::invalid_identifier(s))?,
        };
        Ok(Self { cid, base })
    }

    /// Whether `s` is a syntactically valid identifier string
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// The underlying CID
    pub fn cid(&self) -> &IpldCid {
        &self.cid
    }

    /// Multibase used for the canonical string
    pub fn base(&self) -> Base {
        self.base
    }

    /// Numeric multicodec of the block format
    pub fn codec(&self) -> u64 {
        self.cid.codec()
    }

    /// Format tag, e.g. `dag-cbor`
    ///
    /// Codes missing from the multicodec table render as `0x<hex>`.
    pub fn format(&self) -> SmolStr {
        match multicodec::name_of(self.codec()) {
            Some(name) => SmolStr::new_static(name),
            None => format_smolstr!("0x{:x}", self.codec()),
        }
    }

    /// Digest bytes of the multihash
    pub fn digest(&self) -> &[u8] {
        self.cid.hash().digest()
    }

    /// Canonical string form; round-trips through [`Identifier::parse`]
    pub fn to_canonical_string(&self) -> String {
        match self.cid.version() {
            Version::V0 => self.cid.to_string(),
            Version::V1 => self
                .cid
                .to_string_of_base(self.base)
                .unwrap_or_else(|_| self.cid.to_string()),
        }
    }
}

/// Compute a CIDv1 for raw block bytes
///
/// Uses SHA-256 and tags the CID with `codec`. The bytes are assumed to already
/// be encoded in that format.
pub fn compute_cid(codec: u64, data: &[u8]) -> Result<IpldCid> {
    let mut sha = Sha256::new();
    sha.update(data);
    let hash = sha.finalize().to_vec();
    let mh = multihash::Multihash::<64>::wrap(multicodec::SHA2_256, hash.as_slice())
        .map_err(|e| ResolveError::new(ResolveErrorKind::InvalidIdentifier, Some(Box::new(e))))?;

    Ok(IpldCid::new_v1(codec, mh))
}

impl From<IpldCid> for Identifier {
    fn from(cid: IpldCid) -> Self {
        let base = match cid.version() {
            Version::V0 => Base::Base58Btc,
            Version::V1 => DEFAULT_BASE,
        };
        Self { cid, base }
    }
}

impl From<Identifier> for IpldCid {
    fn from(value: Identifier) -> Self {
        value.cid
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.cid == other.cid
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&self.cid, state);
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cid.cmp(&other.cid)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromStr for Identifier {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V0: &str = "QmdfTbBqBPQ7VNxZEYEj14VmRuZBkqFbiwReogJgS1zR1n";

    fn v1(codec: u64) -> IpldCid {
        compute_cid(codec, b"explorer test block").unwrap()
    }

    #[test]
    fn test_round_trip_v0() {
        let id = Identifier::parse(V0).unwrap();
        assert_eq!(id.to_canonical_string(), V0);
        assert_eq!(id.format(), "dag-pb");
    }

    #[test]
    fn test_round_trip_v1_keeps_base() {
        let b32 = v1(multicodec::DAG_CBOR).to_string();
        assert!(b32.starts_with('b'));
        let id = Identifier::parse(&b32).unwrap();
        assert_eq!(id.to_string(), b32);
        assert_eq!(id.format(), "dag-cbor");
        assert_eq!(id.digest().len(), 32);

        let b58 = id.cid().to_string_of_base(Base::Base58Btc).unwrap();
        let reparsed = Identifier::parse(&b58).unwrap();
        assert_eq!(reparsed.to_string(), b58);
        assert_eq!(reparsed.base(), Base::Base58Btc);
        // same address, different spelling
        assert_eq!(reparsed, id);
    }

    #[test]
    fn test_invalid_strings() {
        assert!(!Identifier::is_valid(""));
        assert!(!Identifier::is_valid("not-a-cid"));
        assert!(!Identifier::is_valid("example.com"));
        assert!(Identifier::is_valid(V0));
    }

    #[test]
    fn test_prefixed_v0_is_rejected() {
        let err = Identifier::parse(&format!("z{}", V0)).unwrap_err();
        assert_eq!(*err.kind(), ResolveErrorKind::InvalidIdentifier);
    }

    #[test]
    fn test_hash_ignores_base() {
        use std::collections::HashSet;

        let id = Identifier::from(v1(multicodec::DAG_CBOR));
        let b58 = Identifier::parse(&id.cid().to_string_of_base(Base::Base58Btc).unwrap()).unwrap();
        let set: HashSet<Identifier> = [id, b58].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_unknown_codec_formats_as_hex() {
        let id = Identifier::from(v1(0x3a7));
        assert_eq!(id.format(), "0x3a7");
        assert_eq!(id.codec(), 0x3a7);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = Identifier::from(v1(multicodec::RAW));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

//! Multicodec table for the formats an identifier can be tagged with
//!
//! Only content-type codes are listed; the numeric code lives in the CID and
//! the name is what the codec registry is keyed on.

/// raw binary
pub const RAW: u64 = 0x55;
/// MerkleDAG protobuf
pub const DAG_PB: u64 = 0x70;
/// MerkleDAG cbor
pub const DAG_CBOR: u64 = 0x71;
/// MerkleDAG json
pub const DAG_JSON: u64 = 0x0129;
/// SHA-256 multihash code
pub const SHA2_256: u64 = 0x12;

const TABLE: &[(u64, &str)] = &[
    (RAW, "raw"),
    (DAG_PB, "dag-pb"),
    (DAG_CBOR, "dag-cbor"),
    (0x72, "libp2p-key"),
    (0x78, "git-raw"),
    (0x7b, "torrent-info"),
    (0x7c, "torrent-file"),
    (0x85, "dag-jose"),
    (0x90, "eth-block"),
    (0x91, "eth-block-list"),
    (0x92, "eth-tx-trie"),
    (0x93, "eth-tx"),
    (0x94, "eth-tx-receipt-trie"),
    (0x95, "eth-tx-receipt"),
    (0x96, "eth-state-trie"),
    (0x97, "eth-account-snapshot"),
    (0x98, "eth-storage-trie"),
    (0xb0, "bitcoin-block"),
    (0xb1, "bitcoin-tx"),
    (0xc0, "zcash-block"),
    (0xc1, "zcash-tx"),
    (DAG_JSON, "dag-json"),
    (0x0200, "json"),
];

/// Name for a multicodec code, if it is a known content type
pub fn name_of(code: u64) -> Option<&'static str> {
    TABLE.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
}

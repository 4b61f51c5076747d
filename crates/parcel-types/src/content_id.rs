//! Content identifier codec.
//!
//! Chain events carry the raw 32-byte SHA2-256 digest of the submitted
//! document. Gateways address the same document by a CIDv1 string:
//!
//! ```text
//! [0x01 version][0x55 raw codec][0x12 sha2-256][0x20 length][32-byte digest]
//! ```
//!
//! base32-encoded (lowercase, unpadded) behind the multibase prefix `b`.

use std::fmt;

use cid::Cid;
use multihash::Multihash;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// SHA2-256 multihash code.
pub const SHA2_256: u64 = 0x12;

/// `raw` multicodec.
pub const RAW_CODEC: u64 = 0x55;

/// Length in bytes of the digest carried by chain events.
pub const DIGEST_LEN: usize = 32;

/// A content identifier as served by IPFS gateways.
///
/// Values are either derived from a chain digest ([`ContentId::from_hash_hex`])
/// or parsed out of an IPLD link ([`ContentId::parse`]); both paths validate
/// the string, so a `ContentId` is always a well-formed CID.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Derive the CID for a hex-encoded 32-byte digest.
    ///
    /// Accepts an optional `0x` prefix. Any other deviation (odd length,
    /// non-hex characters, wrong byte count) is rejected.
    pub fn from_hash_hex(hash_hex: &str) -> Result<Self, TypeError> {
        let trimmed = hash_hex
            .strip_prefix("0x")
            .or_else(|| hash_hex.strip_prefix("0X"))
            .unwrap_or(hash_hex);
        let bytes = hex::decode(trimmed).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let digest: [u8; DIGEST_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| TypeError::InvalidLength {
                    expected: DIGEST_LEN,
                    actual: bytes.len(),
                })?;
        Self::from_digest(&digest)
    }

    /// Derive the CID for a raw SHA2-256 digest.
    pub fn from_digest(digest: &[u8; DIGEST_LEN]) -> Result<Self, TypeError> {
        let mh = Multihash::<64>::wrap(SHA2_256, digest)
            .map_err(|e| TypeError::Multihash(e.to_string()))?;
        Ok(Self(Cid::new_v1(RAW_CODEC, mh).to_string()))
    }

    /// Parse and validate a CID string (v0 or v1) taken from an IPLD link.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let trimmed = value.trim();
        Cid::try_from(trimmed).map_err(|e| TypeError::InvalidCid {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(trimmed.to_string()))
    }

    /// The CID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines: the last 10 characters.
    pub fn short(&self) -> &str {
        let start = self.0.len().saturating_sub(10);
        &self.0[start..]
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

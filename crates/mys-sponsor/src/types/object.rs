//! Object references used for gas payment.

use crate::error::{SponsorError, SponsorResult};
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a digest produced by the ledger.
pub const DIGEST_LENGTH: usize = 32;

/// The digest of one object version, in its base58 text form.
///
/// The text is kept exactly as the ledger reported it. It is only decoded
/// when a transaction is built, so references can be passed around and
/// compared without validating them first.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectDigest(String);

impl ObjectDigest {
    /// Wraps a base58 digest string.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Creates a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    /// Returns the base58 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the base58 text into raw bytes.
    ///
    /// Ledger digests are [`DIGEST_LENGTH`] bytes, but the wire form is
    /// length-prefixed, so any length is carried through unchanged.
    pub fn to_bytes(&self) -> SponsorResult<Vec<u8>> {
        bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| SponsorError::InvalidDigest(format!("{}: {e}", self.0)))
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDigest({})", self.0)
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectDigest {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A reference to one specific version of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// The object id.
    pub object_id: ObjectId,
    /// The object version (sequence number).
    pub version: u64,
    /// The digest of this version.
    pub digest: ObjectDigest,
}

/// A reference to a coin designated to pay for gas.
pub type GasPaymentReference = ObjectRef;

impl ObjectRef {
    /// Creates a new object reference.
    pub fn new(object_id: ObjectId, version: u64, digest: impl Into<ObjectDigest>) -> Self {
        Self {
            object_id,
            version,
            digest: digest.into(),
        }
    }

    /// Returns the `(id, version, digest bytes)` triple in its wire layout.
    pub(crate) fn to_wire(&self) -> SponsorResult<WireObjectRef> {
        Ok(WireObjectRef(
            self.object_id,
            self.version,
            self.digest.to_bytes()?,
        ))
    }
}

/// Wire layout of an object reference: id, version, then the digest as a
/// length-prefixed byte vector.
#[derive(Serialize)]
pub(crate) struct WireObjectRef(ObjectId, u64, Vec<u8>);

//! Sender-agnostic transaction bodies.

use crate::error::SponsorResult;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fmt;

/// The BCS-encoded body of a transaction, independent of sender and gas.
///
/// A wallet typically builds a transaction "kind" only, hands the bytes to a
/// sponsor, and the sponsor wraps them with its own gas data. The bytes are
/// never inspected by this crate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TransactionKind(Vec<u8>);

impl TransactionKind {
    /// Wraps already-encoded kind bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decodes kind bytes from standard base64.
    pub fn from_base64(encoded: &str) -> SponsorResult<Self> {
        Ok(Self(BASE64.decode(encoded.trim())?))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the bytes as standard base64.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Returns true if no bytes are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionKind({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for TransactionKind {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

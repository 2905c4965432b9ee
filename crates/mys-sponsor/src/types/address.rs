//! Address and object id types.
//!
//! Mys addresses and object ids are both 32-byte values, displayed as 64
//! hexadecimal characters with a `0x` prefix. Short forms like `0x2` are
//! zero-padded on the left.

use crate::error::{SponsorError, SponsorResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of an address or object id in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// Parses a (possibly short) hex string into 32 bytes.
fn parse_hex_32(hex_str: &str) -> SponsorResult<[u8; ADDRESS_LENGTH]> {
    let stripped = hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .unwrap_or(hex_str);

    if stripped.is_empty() {
        return Err(SponsorError::InvalidAddress(format!(
            "'{hex_str}' must contain at least one hex digit"
        )));
    }
    if stripped.len() > ADDRESS_LENGTH * 2 {
        return Err(SponsorError::InvalidAddress(format!(
            "too long: {} characters (max {})",
            stripped.len(),
            ADDRESS_LENGTH * 2
        )));
    }

    let padded = format!("{stripped:0>64}");
    let bytes = hex::decode(&padded)?;
    let mut out = [0u8; ADDRESS_LENGTH];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn bytes_from_slice(bytes: &[u8]) -> SponsorResult<[u8; ADDRESS_LENGTH]> {
    <[u8; ADDRESS_LENGTH]>::try_from(bytes).map_err(|_| {
        SponsorError::InvalidAddress(format!(
            "expected {} bytes, got {}",
            ADDRESS_LENGTH,
            bytes.len()
        ))
    })
}

/// A 32-byte Mys account address.
///
/// # Example
///
/// ```rust
/// use mys_sponsor::MysAddress;
///
/// let addr = MysAddress::from_hex("0x2").unwrap();
/// assert_eq!(
///     addr.to_string(),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MysAddress([u8; ADDRESS_LENGTH]);

impl MysAddress {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses an address from hex, with or without the `0x` prefix.
    pub fn from_hex(hex_str: &str) -> SponsorResult<Self> {
        parse_hex_32(hex_str).map(Self)
    }

    /// Creates an address from a 32-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        bytes_from_slice(bytes).map(Self)
    }

    /// Returns the address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns the full `0x`-prefixed hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns true for the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }
}

impl fmt::Debug for MysAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MysAddress({})", self.to_hex())
    }
}

impl fmt::Display for MysAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for MysAddress {
    type Err = SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for MysAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for MysAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for MysAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; ADDRESS_LENGTH]>::deserialize(deserializer).map(Self)
        }
    }
}

/// The id of an on-chain object.
///
/// Object ids share the address format but are kept as a distinct type so a
/// coin id cannot be passed where an owner is expected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId([u8; ADDRESS_LENGTH]);

impl ObjectId {
    /// Creates an object id from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses an object id from hex, with or without the `0x` prefix.
    pub fn from_hex(hex_str: &str) -> SponsorResult<Self> {
        parse_hex_32(hex_str).map(Self)
    }

    /// Creates an object id from a 32-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        bytes_from_slice(bytes).map(Self)
    }

    /// Returns the id bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns the full `0x`-prefixed hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = SponsorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; ADDRESS_LENGTH]>::deserialize(deserializer).map(Self)
        }
    }
}

//! Ed25519 keypairs and Mys transaction signatures.
//!
//! A serialized signature is `flag || signature || public key` encoded as
//! base64, where the flag byte identifies the scheme (`0x00` for Ed25519).

use crate::crypto::hash::{blake2b_256_of, transaction_signing_digest};
use crate::crypto::traits::Signer;
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::SignedTransaction;
use crate::types::MysAddress;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signer as DalekSigner, Verifier as DalekVerifier};
use std::fmt;
use zeroize::Zeroizing;

/// Scheme flag for Ed25519 signatures and addresses.
pub const ED25519_FLAG: u8 = 0x00;
/// Ed25519 private key length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;
/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Ed25519 signature length in bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

const SERIALIZED_SIGNATURE_LENGTH: usize = 1 + ED25519_SIGNATURE_LENGTH + ED25519_PUBLIC_KEY_LENGTH;

/// An Ed25519 keypair.
///
/// The signing key is zeroized when dropped. The type is deliberately not
/// `Clone`: an ephemeral sponsor key lives for one sponsorship call only.
pub struct Ed25519Keypair {
    signing_key: ed25519_dalek::SigningKey,
    address: MysAddress,
}

impl Ed25519Keypair {
    /// Generates a new random keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self::from_signing_key(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Creates a keypair from 32 private key bytes.
    pub fn from_bytes(bytes: &[u8]) -> SponsorResult<Self> {
        let key_bytes = <[u8; ED25519_PRIVATE_KEY_LENGTH]>::try_from(bytes).map_err(|_| {
            SponsorError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                ED25519_PRIVATE_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        let key_bytes = Zeroizing::new(key_bytes);
        Ok(Self::from_signing_key(ed25519_dalek::SigningKey::from_bytes(
            &key_bytes,
        )))
    }

    /// Creates a keypair from a hex-encoded private key.
    pub fn from_hex(hex_str: &str) -> SponsorResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_bytes(&bytes)
    }

    fn from_signing_key(signing_key: ed25519_dalek::SigningKey) -> Self {
        let address = address_from_public_key(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Returns the address derived from this keypair's public key.
    pub fn address(&self) -> MysAddress {
        self.address
    }

    /// Returns the public key bytes.
    pub fn public_key_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Signs transaction bytes and returns the base64 serialized signature.
    pub fn sign_transaction_bytes(&self, tx_bytes: &[u8]) -> String {
        let digest = transaction_signing_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(SERIALIZED_SIGNATURE_LENGTH);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key_bytes());
        BASE64.encode(serialized)
    }
}

#[async_trait]
impl Signer for Ed25519Keypair {
    fn address(&self) -> MysAddress {
        self.address
    }

    async fn sign_transaction(&self, tx_bytes: &[u8]) -> SponsorResult<SignedTransaction> {
        let signature = self.sign_transaction_bytes(tx_bytes);
        Ok(SignedTransaction::new(tx_bytes.to_vec(), signature))
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Keypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derives the Mys address of an Ed25519 public key.
pub fn address_from_public_key(public_key: &[u8; ED25519_PUBLIC_KEY_LENGTH]) -> MysAddress {
    MysAddress::new(blake2b_256_of([&[ED25519_FLAG][..], &public_key[..]]))
}

/// Verifies a serialized Ed25519 signature over transaction bytes.
///
/// Returns the address of the signer on success.
pub fn verify_transaction_signature(tx_bytes: &[u8], signature: &str) -> SponsorResult<MysAddress> {
    let serialized = BASE64.decode(signature)?;
    if serialized.len() != SERIALIZED_SIGNATURE_LENGTH {
        return Err(SponsorError::InvalidSignature(format!(
            "expected {} bytes, got {}",
            SERIALIZED_SIGNATURE_LENGTH,
            serialized.len()
        )));
    }
    if serialized[0] != ED25519_FLAG {
        return Err(SponsorError::InvalidSignature(format!(
            "unsupported scheme flag {:#04x}",
            serialized[0]
        )));
    }

    let mut sig_bytes = [0u8; ED25519_SIGNATURE_LENGTH];
    sig_bytes.copy_from_slice(&serialized[1..=ED25519_SIGNATURE_LENGTH]);
    let mut pk_bytes = [0u8; ED25519_PUBLIC_KEY_LENGTH];
    pk_bytes.copy_from_slice(&serialized[1 + ED25519_SIGNATURE_LENGTH..]);

    let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&pk_bytes)
        .map_err(|e| SponsorError::InvalidSignature(e.to_string()))?;
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
    verifying_key
        .verify(&transaction_signing_digest(tx_bytes), &sig)
        .map_err(|e| SponsorError::InvalidSignature(e.to_string()))?;

    Ok(address_from_public_key(&pk_bytes))
}

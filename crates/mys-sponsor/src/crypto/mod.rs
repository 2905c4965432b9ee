//! Keys, hashing and signatures.

mod ed25519;
mod hash;
mod traits;

pub use ed25519::{
    address_from_public_key, verify_transaction_signature, Ed25519Keypair, ED25519_FLAG,
    ED25519_PRIVATE_KEY_LENGTH, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
pub use hash::{blake2b_256, blake2b_256_of, transaction_signing_digest, TRANSACTION_INTENT};
pub use traits::Signer;

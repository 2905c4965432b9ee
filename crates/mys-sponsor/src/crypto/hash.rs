//! Hash functions used for address derivation and transaction signing.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Intent prefix for signing transaction data: scope `TransactionData`,
/// version `V0`, app id `Mys`.
pub const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// Computes the Blake2b-256 hash of the given data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the Blake2b-256 hash over several byte slices in order.
pub fn blake2b_256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Blake2b256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    hasher.finalize().into()
}

/// Returns the digest a signer signs for the given transaction bytes.
pub fn transaction_signing_digest(tx_bytes: &[u8]) -> [u8; 32] {
    blake2b_256_of([&TRANSACTION_INTENT[..], tx_bytes])
}

//! The signing capability consumed by the executor.

use crate::error::SponsorResult;
use crate::transaction::SignedTransaction;
use crate::types::MysAddress;
use async_trait::async_trait;

/// Something that can sign transaction bytes on behalf of an address.
///
/// Local keypairs implement this directly. Wallets and remote signers
/// implement it by forwarding the bytes and returning what the wallet signed;
/// the returned bytes must be the bytes that were signed.
#[async_trait]
pub trait Signer: Send + Sync {
    /// The address whose signature this signer produces.
    fn address(&self) -> MysAddress;

    /// Signs the given transaction bytes.
    async fn sign_transaction(&self, tx_bytes: &[u8]) -> SponsorResult<SignedTransaction>;
}

#[async_trait]
impl<S: Signer + ?Sized> Signer for std::sync::Arc<S> {
    fn address(&self) -> MysAddress {
        (**self).address()
    }

    async fn sign_transaction(&self, tx_bytes: &[u8]) -> SponsorResult<SignedTransaction> {
        (**self).sign_transaction(tx_bytes).await
    }
}

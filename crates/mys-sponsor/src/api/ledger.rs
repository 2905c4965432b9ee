//! Capabilities the pipeline consumes from the outside world.
//!
//! Components receive these as `Arc<dyn ...>` handles. Implementations must
//! keep no per-call state, so one handle can serve any number of concurrent
//! sponsorship calls.

use crate::api::response::{CoinSummary, Page, TransactionBlockResponse};
use crate::error::SponsorResult;
use crate::transaction::ExecuteOptions;
use crate::types::MysAddress;
use async_trait::async_trait;

/// Read and write access to the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Returns up to `limit` coins owned by `owner`, optionally filtered by
    /// coin type (the native coin when `None`).
    async fn query_owned_coins(
        &self,
        owner: MysAddress,
        coin_type: Option<&str>,
        limit: usize,
    ) -> SponsorResult<Page<CoinSummary>>;

    /// Returns the current reference gas price.
    async fn reference_gas_price(&self) -> SponsorResult<u64>;

    /// Submits signed transaction bytes for execution.
    async fn execute_transaction(
        &self,
        tx_bytes: &[u8],
        signatures: &[String],
        options: ExecuteOptions,
    ) -> SponsorResult<TransactionBlockResponse>;
}

/// A service that credits an address with spendable coins.
#[async_trait]
pub trait FundingService: Send + Sync {
    /// Requests funds for `recipient`. The call is made once; its side effect
    /// cannot be undone, so callers must not retry it blindly.
    async fn request_funds(&self, recipient: MysAddress) -> SponsorResult<()>;
}

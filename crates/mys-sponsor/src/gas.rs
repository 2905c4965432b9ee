//! Waiting for spendable gas coins.

use crate::api::LedgerClient;
use crate::error::{SponsorError, SponsorResult};
use crate::retry::{poll_until, PollConfig, Polled};
use crate::types::{GasPaymentReference, MysAddress, MYS_COIN_TYPE};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Coins requested per query. One coin is enough to pay for gas.
const COINS_PER_QUERY: usize = 1;

/// Polls the ledger until an address owns a spendable gas coin.
///
/// # Example
///
/// ```rust,no_run
/// use mys_sponsor::api::FullnodeClient;
/// use mys_sponsor::gas::GasCoinAcquirer;
/// use mys_sponsor::retry::PollConfig;
/// use mys_sponsor::{MysAddress, SponsorConfig};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Arc::new(FullnodeClient::new(&SponsorConfig::testnet())?);
///     let acquirer = GasCoinAcquirer::new(client);
///     let owner = MysAddress::from_hex("0x123")?;
///     let payment = acquirer.acquire(owner, &PollConfig::sponsor_default()).await?;
///     println!("Paying with {payment:?}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GasCoinAcquirer {
    client: Arc<dyn LedgerClient>,
    coin_type: String,
}

impl GasCoinAcquirer {
    /// Creates an acquirer that looks for the native coin.
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            coin_type: MYS_COIN_TYPE.to_string(),
        }
    }

    /// Looks for coins of a different type.
    #[must_use]
    pub fn with_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = coin_type.into();
        self
    }

    /// Returns the coin type this acquirer looks for.
    pub fn coin_type(&self) -> &str {
        &self.coin_type
    }

    /// Queries `owner`'s coins until at least one appears, and returns the
    /// references from the first non-empty result.
    ///
    /// Each attempt asks for a single coin. Retryable network errors count as
    /// an empty result and consume an attempt.
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::FundingTimeout`] if no coin appears within
    /// `budget`, or the first non-retryable error from the ledger.
    pub async fn acquire(
        &self,
        owner: MysAddress,
        budget: &PollConfig,
    ) -> SponsorResult<Vec<GasPaymentReference>> {
        let polled = poll_until(
            budget,
            || async move {
                let page = self
                    .client
                    .query_owned_coins(owner, Some(self.coin_type.as_str()), COINS_PER_QUERY)
                    .await?;
                let payment = page.data.iter().map(|coin| coin.object_ref()).collect::<Vec<_>>();
                Ok::<_, SponsorError>(payment)
            },
            |payment: &Vec<GasPaymentReference>| !payment.is_empty(),
            SponsorError::is_retryable,
        )
        .await?;

        match polled {
            Polled::Ready { value, attempts } => {
                debug!(owner = %owner, attempts, coins = value.len(), "Gas payment found");
                Ok(value)
            }
            Polled::Exhausted { attempts, elapsed } => {
                warn!(
                    owner = %owner,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "No gas payment found"
                );
                Err(SponsorError::FundingTimeout { owner, attempts })
            }
        }
    }
}

impl fmt::Debug for GasCoinAcquirer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GasCoinAcquirer")
            .field("coin_type", &self.coin_type)
            .finish_non_exhaustive()
    }
}

//! Paying for someone else's transaction with a throwaway key.
//!
//! [`EphemeralSponsor::sponsor`] generates a fresh keypair, asks the funding
//! service to credit it, waits for the coin to land, and builds and signs the
//! caller's transaction with the new key as gas owner. The key is dropped
//! (and zeroized) when the call returns; no two calls share one.

use crate::api::{FundingService, LedgerClient};
use crate::config::SponsorConfig;
use crate::crypto::Ed25519Keypair;
use crate::error::SponsorResult;
use crate::gas::GasCoinAcquirer;
use crate::retry::PollConfig;
use crate::transaction::{SignedTransaction, Transaction, TransactionAssembler, TransactionKind};
use crate::types::MysAddress;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A transaction whose gas is paid and signed for by an ephemeral sponsor.
///
/// `signed.signature` is the sponsor's signature. The ledger also requires
/// the sender's signature over `signed.bytes` before it will execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsoredTransaction {
    /// The assembled transaction, with gas owner and payment filled in.
    pub transaction: Transaction,
    /// The built bytes and the sponsor's signature over them.
    pub signed: SignedTransaction,
    /// Address of the ephemeral sponsor that owns the gas payment.
    pub sponsor: MysAddress,
}

impl SponsoredTransaction {
    /// Returns the built transaction bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.signed.bytes
    }

    /// Returns the sender of the transaction.
    pub fn sender(&self) -> Option<MysAddress> {
        self.transaction.sender()
    }
}

/// Sponsors transactions with a fresh, faucet-funded key per call.
///
/// The ledger client and funding service are shared handles; the sponsor
/// itself holds no per-call state and can serve concurrent calls.
///
/// # Example
///
/// ```rust,no_run
/// use mys_sponsor::api::{FaucetClient, FullnodeClient};
/// use mys_sponsor::transaction::TransactionKind;
/// use mys_sponsor::{EphemeralSponsor, MysAddress, SponsorConfig};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = SponsorConfig::testnet();
///     let sponsor = EphemeralSponsor::from_config(
///         Arc::new(FullnodeClient::new(&config)?),
///         Arc::new(FaucetClient::new(&config)?),
///         &config,
///     );
///
///     let kind = TransactionKind::from_base64("AAAA")?;
///     let sender = MysAddress::from_hex("0xa11ce")?;
///     let sponsored = sponsor.sponsor(sender, kind).await?;
///     println!("Sponsored by {}", sponsored.sponsor);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct EphemeralSponsor {
    acquirer: GasCoinAcquirer,
    assembler: TransactionAssembler,
    funding: Arc<dyn FundingService>,
    poll_config: PollConfig,
}

impl EphemeralSponsor {
    /// Creates a sponsor with the default poll budget and gas budget.
    pub fn new(client: Arc<dyn LedgerClient>, funding: Arc<dyn FundingService>) -> Self {
        Self {
            acquirer: GasCoinAcquirer::new(client.clone()),
            assembler: TransactionAssembler::new(client),
            funding,
            poll_config: PollConfig::sponsor_default(),
        }
    }

    /// Creates a sponsor using the poll budget, gas budget and coin type from
    /// `config`.
    pub fn from_config(
        client: Arc<dyn LedgerClient>,
        funding: Arc<dyn FundingService>,
        config: &SponsorConfig,
    ) -> Self {
        Self {
            acquirer: GasCoinAcquirer::new(client.clone()).with_coin_type(config.coin_type()),
            assembler: TransactionAssembler::new(client).with_gas_budget(config.gas_budget()),
            funding,
            poll_config: config.poll_config().clone(),
        }
    }

    /// Sets the budget for waiting on the funded coin.
    #[must_use]
    pub fn with_poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    /// Sets the gas budget for sponsored transactions.
    #[must_use]
    pub fn with_gas_budget(mut self, gas_budget: u64) -> Self {
        self.assembler = self.assembler.with_gas_budget(gas_budget);
        self
    }

    /// Returns the poll budget.
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll_config
    }

    /// Funds a fresh sponsor key and uses it to pay for `kind` sent by
    /// `sender`.
    ///
    /// The funding request is issued exactly once. If the funded coin does not
    /// show up within the poll budget, no transaction is built.
    ///
    /// # Errors
    ///
    /// Returns a network error if funding or a ledger call fails,
    /// [`FundingTimeout`](crate::SponsorError::FundingTimeout) if no gas coin
    /// appears in time, or an assembly error if the transaction cannot be
    /// built.
    pub async fn sponsor(
        &self,
        sender: MysAddress,
        kind: TransactionKind,
    ) -> SponsorResult<SponsoredTransaction> {
        let keypair = Ed25519Keypair::generate();
        let sponsor = keypair.address();
        info!(sponsor = %sponsor, sender = %sender, "Sponsor address: {sponsor}");

        self.funding.request_funds(sponsor).await?;
        debug!(sponsor = %sponsor, "Funding requested");

        let payment = self.acquirer.acquire(sponsor, &self.poll_config).await?;

        let mut transaction = self.assembler.assemble(kind, sender, sponsor, payment);
        let bytes = self.assembler.build(&mut transaction).await?;
        let signature = keypair.sign_transaction_bytes(&bytes);

        debug!(sponsor = %sponsor, size = bytes.len(), "Sponsored transaction signed");

        Ok(SponsoredTransaction {
            transaction,
            signed: SignedTransaction::new(bytes, signature),
            sponsor,
        })
    }
}

impl fmt::Debug for EphemeralSponsor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralSponsor")
            .field("acquirer", &self.acquirer)
            .field("assembler", &self.assembler)
            .field("poll_config", &self.poll_config)
            .finish_non_exhaustive()
    }
}

//! # Mys Sponsor
//!
//! Sponsored transactions for the Mys network: a throwaway key pays the gas
//! for a transaction whose logical sender is someone else.
//!
//! The pipeline has four stages:
//!
//! 1. [`EphemeralSponsor`] generates a fresh keypair and asks a faucet to fund it.
//! 2. [`GasCoinAcquirer`](gas::GasCoinAcquirer) polls the ledger, a bounded number of
//!    times, until the funded coin is visible.
//! 3. [`TransactionAssembler`](transaction::TransactionAssembler) combines the
//!    caller's transaction kind with the sender, the sponsor as gas owner and
//!    the coin as gas payment, and builds the bytes.
//! 4. [`Executor`] collects signatures, submits, and maps the reported
//!    execution status to success or failure.
//!
//! Every network dependency is passed in explicitly as an
//! `Arc<dyn LedgerClient>` or `Arc<dyn FundingService>`, so concurrent calls
//! share one client and tests can substitute fakes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mys_sponsor::api::{FaucetClient, FullnodeClient};
//! use mys_sponsor::crypto::Ed25519Keypair;
//! use mys_sponsor::transaction::TransactionKind;
//! use mys_sponsor::{EphemeralSponsor, Executor, SponsorConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SponsorConfig::testnet();
//!     let client = Arc::new(FullnodeClient::new(&config)?);
//!     let faucet = Arc::new(FaucetClient::new(&config)?);
//!
//!     let sender = Ed25519Keypair::generate();
//!     let kind = TransactionKind::from_base64("AAAA")?;
//!
//!     let sponsor = EphemeralSponsor::from_config(client.clone(), faucet, &config);
//!     let sponsored = sponsor.sponsor(sender.address(), kind).await?;
//!
//!     let outcome = Executor::new(client)
//!         .execute_sponsored(&sponsored, &sender)
//!         .await?
//!         .into_result()?;
//!     println!("Executed {}", outcome.digest);
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! All operations return [`SponsorResult`]. [`SponsorError::kind`] sorts
//! every error into network trouble, funding timeout, assembly mistake,
//! on-chain execution failure, or other.
//!
//! ## Modules
//!
//! - [`api`] - Ledger and faucet clients
//! - [`config`] - Network presets and pipeline settings
//! - [`crypto`] - Ed25519 keys and transaction signatures
//! - [`executor`] - Signing, submission and outcome mapping
//! - [`gas`] - Waiting for gas coins
//! - [`retry`] - Bounded fixed-interval polling
//! - [`sponsor`] - Ephemeral sponsorship
//! - [`transaction`] - Transaction assembly and encoding
//! - [`types`] - Addresses, object ids and object references

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod executor;
pub mod gas;
pub mod retry;
pub mod sponsor;
pub mod transaction;
pub mod types;

pub use config::{Network, SponsorConfig};
pub use error::{ErrorKind, SponsorError, SponsorResult};
pub use executor::{ExecutionOutcome, Executor, OutcomeStatus};
pub use sponsor::{EphemeralSponsor, SponsoredTransaction};

pub use types::{GasPaymentReference, MysAddress, ObjectId};

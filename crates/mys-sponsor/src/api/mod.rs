//! Ledger and funding collaborators.
//!
//! The pipeline only talks to the outside world through [`LedgerClient`] and
//! [`FundingService`]. [`FullnodeClient`] and [`FaucetClient`] are the HTTP
//! implementations; tests substitute in-memory fakes.

mod faucet;
mod fullnode;
mod ledger;
pub mod response;

pub use faucet::FaucetClient;
pub use fullnode::FullnodeClient;
pub use ledger::{FundingService, LedgerClient};
pub use response::{
    CoinSummary, ExecutionStatus, Page, TransactionBlockResponse, TransactionEffects,
    STATUS_SUCCESS,
};

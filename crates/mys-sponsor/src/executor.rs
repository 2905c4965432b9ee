//! Signing and submitting transactions.
//!
//! An [`Executor`] takes transaction bytes, collects the required signatures
//! and submits them through a [`LedgerClient`]. The ledger's reported
//! `effects.status.status` decides the outcome: `"success"` is a success,
//! anything else (including missing effects) is a failure.
//!
//! Each submission walks a one-way sequence of phases:
//!
//! ```text
//! Idle -> Signing -> Submitted -> Succeeded
//!                              \-> Failed
//! ```
//!
//! Pre-signed transactions skip `Signing`.

use crate::api::{LedgerClient, TransactionBlockResponse, STATUS_SUCCESS};
use crate::crypto::Signer;
use crate::error::{SponsorError, SponsorResult};
use crate::sponsor::SponsoredTransaction;
use crate::transaction::{ExecuteOptions, SignedTransaction, Transaction};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether the ledger executed a transaction successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    /// The ledger reported `"success"`.
    Success,
    /// The ledger reported anything else.
    Failure,
}

/// The result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// Success or failure, as reported by the ledger.
    pub status: OutcomeStatus,
    /// The transaction digest.
    pub digest: String,
    /// Object changes, when they were requested and reported.
    pub object_changes: Option<Vec<Value>>,
    /// Failure detail from the effects, if any.
    pub error: Option<String>,
    reported_status: Option<String>,
}

impl ExecutionOutcome {
    /// Interprets the ledger's response to a submission.
    pub fn from_response(response: TransactionBlockResponse) -> Self {
        let reported_status = response.status().map(str::to_string);
        let status = if reported_status.as_deref() == Some(STATUS_SUCCESS) {
            OutcomeStatus::Success
        } else {
            OutcomeStatus::Failure
        };
        let error = match &response.effects {
            Some(effects) => effects.status.error.clone(),
            None => Some("response carried no effects".to_string()),
        };

        Self {
            status,
            digest: response.digest,
            object_changes: response.object_changes,
            error,
            reported_status,
        }
    }

    /// Returns true if the ledger reported success.
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// Returns the status string the ledger reported, if effects were present.
    pub fn reported_status(&self) -> Option<&str> {
        self.reported_status.as_deref()
    }

    /// Converts a failure into [`SponsorError::ExecutionFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::ExecutionFailed`] unless the status is success.
    pub fn into_result(self) -> SponsorResult<Self> {
        match self.status {
            OutcomeStatus::Success => Ok(self),
            OutcomeStatus::Failure => Err(SponsorError::ExecutionFailed {
                digest: self.digest,
                status: self
                    .reported_status
                    .unwrap_or_else(|| "unknown".to_string()),
                error: self.error,
            }),
        }
    }
}

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionPhase {
    /// Nothing has happened yet.
    Idle,
    /// Waiting for a signature.
    Signing,
    /// Sent to the ledger.
    Submitted,
    /// The ledger reported success.
    Succeeded,
    /// Signing, submission or execution failed.
    Failed,
}

impl ExecutionPhase {
    /// Returns true if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionPhase::Succeeded | ExecutionPhase::Failed)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: ExecutionPhase) -> bool {
        use ExecutionPhase::*;
        matches!(
            (self, next),
            (Idle, Signing)
                | (Idle, Submitted)
                | (Signing, Submitted)
                | (Signing, Failed)
                | (Submitted, Succeeded)
                | (Submitted, Failed)
        )
    }
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionPhase::Idle => "idle",
            ExecutionPhase::Signing => "signing",
            ExecutionPhase::Submitted => "submitted",
            ExecutionPhase::Succeeded => "succeeded",
            ExecutionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the phase of a single submission.
#[derive(Debug)]
pub struct PhaseTracker {
    phase: ExecutionPhase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    /// Starts in [`ExecutionPhase::Idle`].
    pub fn new() -> Self {
        Self {
            phase: ExecutionPhase::Idle,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::Internal`] if the transition is not allowed.
    pub fn advance(&mut self, next: ExecutionPhase) -> SponsorResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(SponsorError::Internal(format!(
                "illegal execution phase transition {} -> {}",
                self.phase, next
            )));
        }
        debug!(from = %self.phase, to = %next, "Execution phase changed");
        self.phase = next;
        Ok(())
    }

    /// Moves to [`ExecutionPhase::Failed`] if the current phase allows it.
    fn fail(&mut self) {
        if self.phase.can_transition_to(ExecutionPhase::Failed) {
            self.phase = ExecutionPhase::Failed;
        }
    }
}

/// Signs and submits transactions.
///
/// # Example
///
/// ```rust,no_run
/// use mys_sponsor::api::FullnodeClient;
/// use mys_sponsor::crypto::Ed25519Keypair;
/// use mys_sponsor::{Executor, SponsorConfig};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Arc::new(FullnodeClient::new(&SponsorConfig::testnet())?);
///     let executor = Executor::new(client);
///     let keypair = Ed25519Keypair::generate();
///     let tx_bytes: Vec<u8> = vec![/* built transaction */];
///     let outcome = executor.sign_and_execute(&tx_bytes, &keypair).await?;
///     println!("Executed {}", outcome.digest);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Executor {
    client: Arc<dyn LedgerClient>,
    options: ExecuteOptions,
}

impl Executor {
    /// Creates an executor that asks for effects and object changes.
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            options: ExecuteOptions::default(),
        }
    }

    /// Sets what the ledger should report back.
    #[must_use]
    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the execute options.
    pub fn options(&self) -> ExecuteOptions {
        self.options
    }

    /// Signs `tx_bytes` with `signer` and submits the result.
    ///
    /// A failed execution is returned as an outcome with
    /// [`OutcomeStatus::Failure`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or the submission call fails.
    pub async fn execute_with_signer(
        &self,
        tx_bytes: &[u8],
        signer: &dyn Signer,
    ) -> SponsorResult<ExecutionOutcome> {
        let mut tracker = PhaseTracker::new();
        tracker.advance(ExecutionPhase::Signing)?;
        let signed = match signer.sign_transaction(tx_bytes).await {
            Ok(signed) => signed,
            Err(e) => {
                tracker.fail();
                return Err(e);
            }
        };
        self.submit(&mut tracker, &signed.bytes, &[signed.signature])
            .await
    }

    /// Builds `transaction`, has `signer` sign it and submits the result.
    ///
    /// The transaction must already carry a gas price and payment.
    ///
    /// # Errors
    ///
    /// Returns an assembly error if the transaction cannot be built, or an
    /// error if signing or submission fails.
    pub async fn execute_transaction(
        &self,
        transaction: &Transaction,
        signer: &dyn Signer,
    ) -> SponsorResult<ExecutionOutcome> {
        let tx_bytes = transaction.build()?;
        self.execute_with_signer(&tx_bytes, signer).await
    }

    /// Submits a transaction that already carries its signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission call fails.
    pub async fn execute_signed(&self, signed: &SignedTransaction) -> SponsorResult<ExecutionOutcome> {
        let mut tracker = PhaseTracker::new();
        self.submit(&mut tracker, &signed.bytes, std::slice::from_ref(&signed.signature))
            .await
    }

    /// Adds the sender's signature to a sponsored transaction and submits it
    /// with both signatures, sender first.
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::InvalidSignature`] if `sender` is not the
    /// transaction's sender, or an error if signing or submission fails.
    pub async fn execute_sponsored(
        &self,
        sponsored: &SponsoredTransaction,
        sender: &dyn Signer,
    ) -> SponsorResult<ExecutionOutcome> {
        let mut tracker = PhaseTracker::new();
        tracker.advance(ExecutionPhase::Signing)?;

        if sponsored.sender() != Some(sender.address()) {
            tracker.fail();
            return Err(SponsorError::InvalidSignature(format!(
                "signer {} is not the transaction sender",
                sender.address()
            )));
        }

        let sender_signed = match sender.sign_transaction(sponsored.bytes()).await {
            Ok(signed) => signed,
            Err(e) => {
                tracker.fail();
                return Err(e);
            }
        };

        let signatures = [sender_signed.signature, sponsored.signed.signature.clone()];
        self.submit(&mut tracker, sponsored.bytes(), &signatures)
            .await
    }

    /// Signs and submits, returning only a successful outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::ExecutionFailed`] if the ledger reports
    /// anything but success, or an error if signing or submission fails.
    pub async fn sign_and_execute(
        &self,
        tx_bytes: &[u8],
        signer: &dyn Signer,
    ) -> SponsorResult<ExecutionOutcome> {
        self.execute_with_signer(tx_bytes, signer)
            .await?
            .into_result()
    }

    async fn submit(
        &self,
        tracker: &mut PhaseTracker,
        tx_bytes: &[u8],
        signatures: &[String],
    ) -> SponsorResult<ExecutionOutcome> {
        tracker.advance(ExecutionPhase::Submitted)?;

        let response = match self
            .client
            .execute_transaction(tx_bytes, signatures, self.options)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracker.fail();
                warn!(error = %e, "Transaction submission failed");
                return Err(e);
            }
        };

        let outcome = ExecutionOutcome::from_response(response);
        if outcome.is_success() {
            tracker.advance(ExecutionPhase::Succeeded)?;
            info!(digest = %outcome.digest, "Transaction executed successfully");
        } else {
            tracker.advance(ExecutionPhase::Failed)?;
            warn!(
                digest = %outcome.digest,
                status = ?outcome.reported_status(),
                error = ?outcome.error,
                "Transaction execution failed"
            );
        }
        Ok(outcome)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

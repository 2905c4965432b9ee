//! Transaction assembly.
//!
//! A [`Transaction`] is a mutable builder that collects a kind, a sender, an
//! optional gas owner and the gas payment. [`Transaction::build`] encodes the
//! collected parts into the BCS bytes of `TransactionData::V1`:
//!
//! ```text
//! 0x00                      variant tag (V1)
//! kind bytes                copied verbatim
//! sender                    32 bytes
//! gas data                  payment vec, owner, price u64, budget u64
//! 0x00                      expiration: None
//! ```

use crate::api::LedgerClient;
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::TransactionKind;
use crate::types::{GasPaymentReference, MysAddress, WireObjectRef};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default gas budget in MIST.
pub const DEFAULT_GAS_BUDGET: u64 = 50_000_000;

const TRANSACTION_DATA_V1: u8 = 0;
const EXPIRATION_NONE: u8 = 0;

#[derive(Serialize)]
struct WireGasData {
    payment: Vec<WireObjectRef>,
    owner: MysAddress,
    price: u64,
    budget: u64,
}

/// A transaction under construction.
///
/// # Example
///
/// ```rust
/// use mys_sponsor::transaction::{Transaction, TransactionKind};
/// use mys_sponsor::types::{MysAddress, ObjectDigest, ObjectId, ObjectRef};
///
/// let sender = MysAddress::from_hex("0xa").unwrap();
/// let mut tx = Transaction::from_kind(TransactionKind::new(vec![0u8; 4]));
/// tx.set_sender(sender);
/// tx.set_gas_payment(vec![ObjectRef::new(
///     ObjectId::from_hex("0x1").unwrap(),
///     3,
///     ObjectDigest::from_bytes([0u8; 32]),
/// )]);
/// tx.set_gas_price(1_000);
///
/// let bytes = tx.build().unwrap();
/// assert_eq!(bytes[0], 0);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    sender: Option<MysAddress>,
    gas_owner: Option<MysAddress>,
    gas_payment: Vec<GasPaymentReference>,
    gas_price: Option<u64>,
    gas_budget: Option<u64>,
}

impl Transaction {
    /// Starts a transaction from a kind with nothing else set.
    pub fn from_kind(kind: TransactionKind) -> Self {
        Self {
            kind,
            sender: None,
            gas_owner: None,
            gas_payment: Vec::new(),
            gas_price: None,
            gas_budget: None,
        }
    }

    /// Sets the sender.
    pub fn set_sender(&mut self, sender: MysAddress) -> &mut Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the gas owner. Without this the sender pays for gas.
    pub fn set_gas_owner(&mut self, owner: MysAddress) -> &mut Self {
        self.gas_owner = Some(owner);
        self
    }

    /// Replaces the gas payment.
    pub fn set_gas_payment(&mut self, payment: Vec<GasPaymentReference>) -> &mut Self {
        self.gas_payment = payment;
        self
    }

    /// Sets the gas price.
    pub fn set_gas_price(&mut self, price: u64) -> &mut Self {
        self.gas_price = Some(price);
        self
    }

    /// Sets the gas budget.
    pub fn set_gas_budget(&mut self, budget: u64) -> &mut Self {
        self.gas_budget = Some(budget);
        self
    }

    /// Returns the kind.
    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    /// Returns the sender, if set.
    pub fn sender(&self) -> Option<MysAddress> {
        self.sender
    }

    /// Returns the effective gas owner: the explicit owner, else the sender.
    pub fn gas_owner(&self) -> Option<MysAddress> {
        self.gas_owner.or(self.sender)
    }

    /// Returns the gas payment references.
    pub fn gas_payment(&self) -> &[GasPaymentReference] {
        &self.gas_payment
    }

    /// Returns the gas price, if set.
    pub fn gas_price(&self) -> Option<u64> {
        self.gas_price
    }

    /// Returns the gas budget, if set.
    pub fn gas_budget(&self) -> Option<u64> {
        self.gas_budget
    }

    /// Returns true if the gas owner differs from the sender.
    pub fn is_sponsored(&self) -> bool {
        matches!((self.sender, self.gas_owner), (Some(s), Some(o)) if s != o)
    }

    /// Encodes the transaction into its signable bytes.
    ///
    /// The output depends only on the fields of this builder, so building the
    /// same transaction twice yields identical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::Assembly`] if the kind is empty, the sender or
    /// gas price is unset, the payment is empty or names an object twice, or a
    /// payment digest is not valid base58.
    pub fn build(&self) -> SponsorResult<Vec<u8>> {
        if self.kind.is_empty() {
            return Err(SponsorError::assembly("transaction kind is empty"));
        }
        let sender = self
            .sender
            .ok_or_else(|| SponsorError::assembly("sender is required"))?;
        if self.gas_payment.is_empty() {
            return Err(SponsorError::assembly("gas payment is required"));
        }
        let mut seen = HashSet::with_capacity(self.gas_payment.len());
        for object_ref in &self.gas_payment {
            if !seen.insert(object_ref.object_id) {
                return Err(SponsorError::assembly(format!(
                    "gas payment lists object {} more than once",
                    object_ref.object_id
                )));
            }
        }
        let price = self
            .gas_price
            .ok_or_else(|| SponsorError::assembly("gas price is required"))?;

        let payment = self
            .gas_payment
            .iter()
            .map(GasPaymentReference::to_wire)
            .collect::<SponsorResult<Vec<_>>>()
            .map_err(|e| SponsorError::assembly(format!("invalid gas payment: {e}")))?;

        let gas_data = WireGasData {
            payment,
            owner: self.gas_owner.unwrap_or(sender),
            price,
            budget: self.gas_budget.unwrap_or(DEFAULT_GAS_BUDGET),
        };

        let mut bytes = vec![TRANSACTION_DATA_V1];
        bytes.extend_from_slice(self.kind.as_bytes());
        bytes.extend(bcs::to_bytes(&sender).map_err(SponsorError::bcs)?);
        bytes.extend(bcs::to_bytes(&gas_data).map_err(SponsorError::bcs)?);
        bytes.push(EXPIRATION_NONE);
        Ok(bytes)
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("kind", &self.kind)
            .field("sender", &self.sender)
            .field("gas_owner", &self.gas_owner())
            .field("gas_payment", &self.gas_payment)
            .field("gas_price", &self.gas_price)
            .field("gas_budget", &self.gas_budget)
            .finish()
    }
}

/// Combines transaction parts and builds them against a ledger.
///
/// The ledger is only consulted for the reference gas price, and only when
/// the transaction does not already carry one.
#[derive(Clone)]
pub struct TransactionAssembler {
    client: Arc<dyn LedgerClient>,
    gas_budget: u64,
}

impl TransactionAssembler {
    /// Creates an assembler using the default gas budget.
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            gas_budget: DEFAULT_GAS_BUDGET,
        }
    }

    /// Sets the gas budget applied to assembled transactions.
    #[must_use]
    pub fn with_gas_budget(mut self, gas_budget: u64) -> Self {
        self.gas_budget = gas_budget;
        self
    }

    /// Combines a kind, sender, gas owner and payment into a transaction.
    pub fn assemble(
        &self,
        kind: TransactionKind,
        sender: MysAddress,
        gas_owner: MysAddress,
        payment: Vec<GasPaymentReference>,
    ) -> Transaction {
        let mut tx = Transaction::from_kind(kind);
        tx.set_sender(sender)
            .set_gas_owner(gas_owner)
            .set_gas_payment(payment)
            .set_gas_budget(self.gas_budget);
        tx
    }

    /// Builds the transaction, fetching the reference gas price if unset.
    ///
    /// The fetched price is written back into `tx`, so building again does
    /// not hit the network and yields the same bytes.
    ///
    /// # Errors
    ///
    /// Returns a network error if the gas price query fails, or an assembly
    /// error from [`Transaction::build`].
    pub async fn build(&self, tx: &mut Transaction) -> SponsorResult<Vec<u8>> {
        if tx.gas_price.is_none() {
            let price = self.client.reference_gas_price().await?;
            debug!(price, "Using reference gas price");
            tx.set_gas_price(price);
        }
        if tx.gas_budget.is_none() {
            tx.set_gas_budget(self.gas_budget);
        }
        tx.build()
    }
}

impl fmt::Debug for TransactionAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionAssembler")
            .field("gas_budget", &self.gas_budget)
            .finish_non_exhaustive()
    }
}

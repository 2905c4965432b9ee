//! Transaction assembly and signed transaction types.

mod builder;
mod kind;
mod types;

pub use builder::{Transaction, TransactionAssembler, DEFAULT_GAS_BUDGET};
pub use kind::TransactionKind;
pub use types::{ExecuteOptions, SignedTransaction};

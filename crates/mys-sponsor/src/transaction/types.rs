//! Signed transaction types.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Transaction bytes together with one signature over them.
///
/// The signature is the base64 serialized form the ledger expects
/// (`flag || signature || public key`). Both fields are opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The built transaction bytes that were signed.
    pub bytes: Vec<u8>,
    /// The serialized signature, base64 encoded.
    pub signature: String,
}

impl SignedTransaction {
    /// Creates a new signed transaction.
    pub fn new(bytes: Vec<u8>, signature: String) -> Self {
        Self { bytes, signature }
    }

    /// Returns the transaction bytes as standard base64.
    pub fn bytes_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// Options controlling what the ledger reports back after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Include transaction effects (required to read the execution status).
    pub show_effects: bool,
    /// Include the list of object changes.
    pub show_object_changes: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            show_effects: true,
            show_object_changes: true,
        }
    }
}

impl ExecuteOptions {
    /// Requests effects only.
    pub fn effects_only() -> Self {
        Self {
            show_effects: true,
            show_object_changes: false,
        }
    }
}

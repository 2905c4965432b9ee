//! Error types for the sponsorship pipeline.
//!
//! Every failure surfaces as a [`SponsorError`]. Callers that only care about
//! the broad category (network trouble, funding timeout, assembly mistake, or
//! an on-chain execution failure) can match on [`SponsorError::kind`] instead of
//! inspecting messages.

use crate::types::MysAddress;
use std::fmt;
use thiserror::Error;

/// A specialized Result type for sponsorship operations.
pub type SponsorResult<T> = Result<T, SponsorError>;

/// The broad category of a [`SponsorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An RPC or service call failed.
    Network,
    /// The gas coin poll ran out of attempts without finding payment.
    FundingTimeout,
    /// A transaction could not be built from its parts.
    Assembly,
    /// The ledger executed the transaction and reported a non-success status.
    ExecutionFailed,
    /// Anything else (malformed input, encoding problems, configuration).
    Other,
}

/// The main error type for the sponsorship pipeline.
#[derive(Error, Debug)]
pub enum SponsorError {
    /// Error occurred during HTTP communication
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object
    #[error("RPC error ({code}): {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },

    /// A service returned a non-success HTTP status
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body or error description
        message: String,
    },

    /// No gas coin appeared for the owner within the poll budget
    #[error("no gas payment found for {owner} after {attempts} attempts")]
    FundingTimeout {
        /// The address that was polled
        owner: MysAddress,
        /// How many queries were issued
        attempts: u32,
    },

    /// A transaction could not be built
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// The ledger reported a non-success execution status
    #[error("Execution failed for {digest}: {status}")]
    ExecutionFailed {
        /// Digest of the executed transaction
        digest: String,
        /// The status string reported by the ledger
        status: String,
        /// Optional error detail from the effects
        error: Option<String>,
    },

    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during BCS serialization
    #[error("BCS error: {0}")]
    Bcs(String),

    /// Error occurred during URL parsing
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Error occurred during hex decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Error occurred during base64 decoding
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid address or object id
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid object digest
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SponsorError {
    /// Creates a new BCS error
    pub fn bcs<E: fmt::Display>(err: E) -> Self {
        Self::Bcs(err.to_string())
    }

    /// Creates a new assembly error
    pub fn assembly<S: Into<String>>(msg: S) -> Self {
        Self::Assembly(msg.into())
    }

    /// Creates a new API error from response details
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Rpc { .. } | Self::Api { .. } => ErrorKind::Network,
            Self::FundingTimeout { .. } => ErrorKind::FundingTimeout,
            Self::Assembly(_) => ErrorKind::Assembly,
            Self::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
            _ => ErrorKind::Other,
        }
    }

    /// Returns true if this is a funding timeout
    pub fn is_funding_timeout(&self) -> bool {
        matches!(self, Self::FundingTimeout { .. })
    }

    /// Returns true if this is a transient error that might succeed on retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status_code, .. } => {
                matches!(status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Returns the error message suitable for display to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Rpc { .. } => "Network error occurred",
            Self::Api {
                status_code: 429, ..
            } => "Rate limit exceeded",
            Self::Api { status_code, .. } if *status_code >= 500 => "Server error",
            Self::Api { .. } => "API error",
            Self::FundingTimeout { .. } => "Timed out waiting for gas funding",
            Self::Assembly(_) => "Transaction could not be built",
            Self::ExecutionFailed { .. } => "Transaction execution failed",
            Self::Json(_) | Self::Bcs(_) => "Failed to process data",
            Self::Url(_) => "Invalid URL",
            Self::Hex(_) | Self::Base64(_) => "Invalid encoding",
            Self::InvalidAddress(_) => "Invalid address",
            Self::InvalidDigest(_) => "Invalid object digest",
            Self::InvalidPrivateKey(_) => "Invalid private key",
            Self::InvalidSignature(_) => "Invalid signature",
            Self::Config(_) => "Configuration error",
            Self::Internal(_) => "Internal error",
        }
    }
}

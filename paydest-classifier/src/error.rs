//! Error types for destination parsing
//!
//! These errors never escape [`crate::classify`]; they explain why a specific
//! scheme rejected the text and surface only through the detailed parse API.

use thiserror::Error;

use crate::Network;

/// Result type alias for destination parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a piece of text failed to parse as a specific destination scheme
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Nothing to parse
    #[error("Empty input")]
    Empty,

    /// Input exceeds the maximum length the classifier inspects
    #[error("Input too long: {0} bytes")]
    TooLong(usize),

    /// Invalid on-chain address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Human-readable part does not belong to a known network
    #[error("Unknown human-readable part: {0}")]
    UnknownHrp(String),

    /// Invalid node public key
    #[error("Invalid node public key: {0}")]
    InvalidNodeKey(String),

    /// Invalid `pubkey@host:port` connection string
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Structurally invalid invoice
    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),

    /// Invalid invoice amount in the human-readable part
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Bech32 encoding/decoding error
    #[error("Bech32 error: {0}")]
    Bech32(String),

    /// Base58Check decoding error
    #[error("Base58 error: {0}")]
    Base58(String),

    /// Hex decoding error
    #[error("Hex error: {0}")]
    Hex(String),

    /// Destination is valid but belongs to a network the classifier was told to refuse
    #[error("Destination is for {found}, expected {expected}")]
    WrongNetwork { expected: Network, found: Network },

    /// Text matched no supported scheme
    #[error("Unrecognized destination")]
    Unrecognized,
}

impl From<bech32::primitives::decode::CheckedHrpstringError> for Error {
    fn from(e: bech32::primitives::decode::CheckedHrpstringError) -> Self {
        Error::Bech32(e.to_string())
    }
}

impl From<bech32::segwit::DecodeError> for Error {
    fn from(e: bech32::segwit::DecodeError) -> Self {
        Error::Bech32(e.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::Hex(e.to_string())
    }
}

impl From<bs58::decode::Error> for Error {
    fn from(e: bs58::decode::Error) -> Self {
        Error::Base58(e.to_string())
    }
}

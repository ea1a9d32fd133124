//! # Send destination classification
//!
//! Decides what kind of payment target a user-supplied string is:
//!
//! - a Bitcoin **on-chain address** (Base58Check or Bech32/Bech32m segwit),
//! - a Lightning **node public key** (33-byte compressed secp256k1 point in
//!   hex, optionally as a `pubkey@host:port` connection string),
//! - a BOLT 11 **invoice**,
//! - or **unknown**.
//!
//! Classification is total and deterministic. Every string, including the
//! empty string, maps to exactly one [`DestinationKind`], and validity is
//! decided only by the structure of the text (lengths, charsets, checksums,
//! version bytes and curve membership). No network lookups are made.
//!
//! ## Normalization
//!
//! Text is classified exactly as given. Surrounding whitespace is not
//! trimmed, so `" bc1q... "` is [`DestinationKind::Unknown`]. Case follows
//! each encoding: Bech32 is accepted in all-lowercase or all-uppercase,
//! hex keys in either case, Base58 only as written. URI scheme names are
//! case-insensitive.
//!
//! ## Priority
//!
//! Schemes are tried in [`CLASSIFICATION_ORDER`]: node keys, then on-chain
//! addresses, then invoices.
//!
//! ```
//! use paydest_classifier::{classify, DestinationKind};
//!
//! assert_eq!(
//!     classify("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
//!     DestinationKind::OnChainAddress
//! );
//! assert_eq!(classify(""), DestinationKind::Unknown);
//! ```

pub mod address;
mod classify;
mod config;
mod error;
pub mod invoice;
mod network;
pub mod node;
pub mod uri;

pub use address::{parse_address, AddressType, OnChainAddress};
pub use classify::{
    classify, parse_destination, Classifier, Destination, DestinationKind, Scheme,
    CLASSIFICATION_ORDER, MAX_INPUT_LEN,
};
pub use config::{
    ClassifierConfig, ALLOW_CONNECTION_STRINGS_ENV, ALLOW_URI_SCHEMES_ENV, NETWORK_ENV,
};
pub use error::{Error, Result};
pub use invoice::{parse_invoice, InvoiceSummary};
pub use network::Network;
pub use node::{parse_connection_string, parse_node_pubkey, NodeId, NodeTarget};

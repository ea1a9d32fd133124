//! Destination classification
//!
//! Schemes are tried in [`CLASSIFICATION_ORDER`]; the first that accepts the
//! text wins. Every input resolves to exactly one [`DestinationKind`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    address::{parse_base58_address, parse_segwit_address, OnChainAddress},
    invoice::{parse_invoice, InvoiceSummary},
    node::{parse_connection_string, parse_node_pubkey, NodeTarget},
    uri::{parse_bitcoin_uri, parse_lightning_uri},
    ClassifierConfig, Error, Network, Result,
};

/// Inputs longer than this are [`DestinationKind::Unknown`] without inspection
pub const MAX_INPUT_LEN: usize = 8192;

/// What kind of payment target a piece of text is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    /// Bitcoin address
    OnChainAddress,
    /// Lightning node public key
    NodePublicKey,
    /// BOLT 11 invoice
    Invoice,
    /// Nothing recognizable
    Unknown,
}

impl DestinationKind {
    /// All kinds
    pub const ALL: [DestinationKind; 4] = [
        DestinationKind::OnChainAddress,
        DestinationKind::NodePublicKey,
        DestinationKind::Invoice,
        DestinationKind::Unknown,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::OnChainAddress => "on_chain_address",
            DestinationKind::NodePublicKey => "node_public_key",
            DestinationKind::Invoice => "invoice",
            DestinationKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete encoding the classifier knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// 66 hex characters
    NodePublicKey,
    /// `<pubkey>@<host>[:<port>]`
    ConnectionString,
    /// Bech32/Bech32m segwit address
    SegwitAddress,
    /// Base58Check P2PKH/P2SH address
    Base58Address,
    /// `bitcoin:<address>[?params]`
    BitcoinUri,
    /// Bare BOLT 11 invoice
    Invoice,
    /// `lightning:<invoice>`
    LightningUri,
}

/// Order in which schemes are tried. The first match decides the kind.
pub const CLASSIFICATION_ORDER: [Scheme; 7] = [
    Scheme::NodePublicKey,
    Scheme::ConnectionString,
    Scheme::SegwitAddress,
    Scheme::Base58Address,
    Scheme::BitcoinUri,
    Scheme::Invoice,
    Scheme::LightningUri,
];

impl Scheme {
    /// The kind this scheme classifies as
    pub fn kind(&self) -> DestinationKind {
        match self {
            Scheme::NodePublicKey | Scheme::ConnectionString => DestinationKind::NodePublicKey,
            Scheme::SegwitAddress | Scheme::Base58Address | Scheme::BitcoinUri => {
                DestinationKind::OnChainAddress
            }
            Scheme::Invoice | Scheme::LightningUri => DestinationKind::Invoice,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::NodePublicKey => "node_public_key",
            Scheme::ConnectionString => "connection_string",
            Scheme::SegwitAddress => "segwit_address",
            Scheme::Base58Address => "base58_address",
            Scheme::BitcoinUri => "bitcoin_uri",
            Scheme::Invoice => "invoice",
            Scheme::LightningUri => "lightning_uri",
        }
    }

    fn is_uri(&self) -> bool {
        matches!(self, Scheme::BitcoinUri | Scheme::LightningUri)
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recognized destination with its decoded details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// On-chain address
    #[serde(rename = "on_chain_address")]
    OnChain(OnChainAddress),
    /// Lightning node
    #[serde(rename = "node_public_key")]
    Node(NodeTarget),
    /// BOLT 11 invoice
    Invoice(InvoiceSummary),
}

impl Destination {
    /// The classification this destination corresponds to
    pub fn kind(&self) -> DestinationKind {
        match self {
            Destination::OnChain(_) => DestinationKind::OnChainAddress,
            Destination::Node(_) => DestinationKind::NodePublicKey,
            Destination::Invoice(_) => DestinationKind::Invoice,
        }
    }

    /// Network the destination is bound to. Node keys are network-agnostic.
    pub fn network(&self) -> Option<Network> {
        match self {
            Destination::OnChain(address) => Some(address.network),
            Destination::Node(_) => None,
            Destination::Invoice(invoice) => Some(invoice.network),
        }
    }

    /// Whether a wallet on `network` can pay this destination
    pub fn is_valid_for(&self, network: Network) -> bool {
        match self {
            Destination::OnChain(address) => address.is_valid_for(network),
            Destination::Node(_) => true,
            Destination::Invoice(invoice) => invoice.is_valid_for(network),
        }
    }
}

impl FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Classifier::default().parse(s)
    }
}

/// Classifies text under a [`ClassifierConfig`].
///
/// Holds no mutable state; share it freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with the given configuration
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify `text`. Never fails: anything unrecognized is `Unknown`.
    pub fn classify(&self, text: &str) -> DestinationKind {
        match self.resolve(text) {
            Ok((scheme, _)) => scheme.kind(),
            Err(_) => DestinationKind::Unknown,
        }
    }

    /// Parse `text` into a detailed [`Destination`]
    pub fn parse(&self, text: &str) -> Result<Destination> {
        self.resolve(text).map(|(_, destination)| destination)
    }

    /// The scheme that matched `text`, if any
    pub fn matched_scheme(&self, text: &str) -> Option<Scheme> {
        self.resolve(text).ok().map(|(scheme, _)| scheme)
    }

    fn resolve(&self, text: &str) -> Result<(Scheme, Destination)> {
        if text.is_empty() {
            return Err(Error::Empty);
        }
        if text.len() > MAX_INPUT_LEN {
            return Err(Error::TooLong(text.len()));
        }

        // A scheme that matched but is for the wrong network explains an
        // `Unknown` better than `Unrecognized` does.
        let mut wrong_network = None;

        for scheme in CLASSIFICATION_ORDER {
            if !self.is_enabled(scheme) {
                continue;
            }
            match self.try_scheme(scheme, text) {
                Ok(destination) => return Ok((scheme, destination)),
                Err(err @ Error::WrongNetwork { .. }) => {
                    trace!(scheme = scheme.as_str(), error = %err, "destination on another network");
                    wrong_network.get_or_insert(err);
                }
                Err(err) => {
                    trace!(scheme = scheme.as_str(), error = %err, "scheme did not match");
                }
            }
        }

        Err(wrong_network.unwrap_or(Error::Unrecognized))
    }

    fn is_enabled(&self, scheme: Scheme) -> bool {
        if scheme.is_uri() {
            return self.config.allow_uri_schemes;
        }
        if scheme == Scheme::ConnectionString {
            return self.config.allow_connection_strings;
        }
        true
    }

    fn try_scheme(&self, scheme: Scheme, text: &str) -> Result<Destination> {
        let destination = match scheme {
            Scheme::NodePublicKey => Destination::Node(NodeTarget {
                node_id: parse_node_pubkey(text)?,
                socket_addr: None,
            }),
            Scheme::ConnectionString => Destination::Node(parse_connection_string(text)?),
            Scheme::SegwitAddress => Destination::OnChain(parse_segwit_address(text)?),
            Scheme::Base58Address => Destination::OnChain(parse_base58_address(text)?),
            Scheme::BitcoinUri => Destination::OnChain(parse_bitcoin_uri(text)?),
            Scheme::Invoice => Destination::Invoice(parse_invoice(text)?),
            Scheme::LightningUri => Destination::Invoice(parse_lightning_uri(text)?),
        };

        if let (Some(expected), Some(found)) = (self.config.network, destination.network()) {
            if !destination.is_valid_for(expected) {
                return Err(Error::WrongNetwork { expected, found });
            }
        }
        Ok(destination)
    }
}

/// Classify `text` with the default configuration
pub fn classify(text: &str) -> DestinationKind {
    Classifier::default().classify(text)
}

/// Parse `text` with the default configuration
pub fn parse_destination(text: &str) -> Result<Destination> {
    Classifier::default().parse(text)
}
